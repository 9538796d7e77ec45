//! UCI output-line parser.
//!
//! Turns one line of engine output into a typed message. Total over arbitrary
//! input: anything unrecognized yields [`EngineMessage::Unknown`], never an
//! error.

/// Engine score as reported on an `info` line, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns.
    Cp(i32),
    /// Moves until mate; positive means the side to move mates.
    Mate(i32),
}

/// Typed view of one `info` line. Every field is optional; engines emit
/// whichever subset applies to the current search iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    pub time: Option<u64>,
    pub nodes: Option<u64>,
    /// Principal variation, raw coordinate-notation tokens.
    pub pv: Option<Vec<String>>,
    pub multipv: Option<u32>,
    pub score: Option<Score>,
    pub currmove: Option<String>,
    pub currmovenumber: Option<u32>,
    pub bmc: Option<f64>,
    pub hashfull: Option<u32>,
    pub nps: Option<u64>,
    pub tbhits: Option<u64>,
    pub sbhits: Option<u64>,
    pub cpuload: Option<u32>,
    pub string: Option<String>,
    pub refutation: Option<Vec<String>>,
    pub currline: Option<Vec<String>>,
}

/// One parsed line of engine output.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// `uciok`
    EngineLoaded,
    /// `readyok`
    Ready,
    Info(Info),
    /// `bestmove <from><to>[promotion]`; a trailing `ponder <move>` is ignored.
    BestMove {
        from: String,
        to: String,
        promotion: Option<char>,
    },
    /// `bestmove (none)`
    NoMove,
    /// `info ... score mate 0`: the side to move is already checkmated.
    Mated,
    Unknown,
}

/// Parse one line of engine output.
pub fn parse(line: &str) -> EngineMessage {
    let line = line.trim();
    match line {
        "uciok" => return EngineMessage::EngineLoaded,
        "readyok" => return EngineMessage::Ready,
        _ => {}
    }

    if line.starts_with("info") {
        let info = parse_info(line);
        if info.score == Some(Score::Mate(0)) {
            return EngineMessage::Mated;
        }
        return EngineMessage::Info(info);
    }

    let mut tokens = line.split_whitespace();
    if tokens.next() == Some("bestmove") {
        return match tokens.next() {
            Some("(none)") => EngineMessage::NoMove,
            Some(mv) => match split_move(mv) {
                Some((from, to, promotion)) => EngineMessage::BestMove {
                    from,
                    to,
                    promotion,
                },
                None => EngineMessage::Unknown,
            },
            None => EngineMessage::Unknown,
        };
    }

    EngineMessage::Unknown
}

/// The keyword vocabulary of `info` lines. Any other token is a value for
/// whichever keyword is currently accumulating.
const KEYWORDS: &[&str] = &[
    "depth",
    "seldepth",
    "time",
    "nodes",
    "pv",
    "multipv",
    "score",
    "currmove",
    "currmovenumber",
    "bmc",
    "hashfull",
    "nps",
    "tbhits",
    "sbhits",
    "cpuload",
    "string",
    "refutation",
    "currline",
];

/// Parse the keyword/value stream of an `info` line.
///
/// Tokens are split on whitespace with quote characters stripped. Values
/// accumulate under the most recently seen keyword; tokens before the first
/// keyword (the leading `info` itself) are dropped. A repeated keyword
/// overwrites the earlier value.
pub fn parse_info(line: &str) -> Info {
    let mut info = Info::default();
    let mut current: Option<&str> = None;
    let mut values: Vec<String> = Vec::new();

    for token in line.split_whitespace() {
        let token = token.trim_matches('"');
        if KEYWORDS.contains(&token) {
            if let Some(keyword) = current.take() {
                finish_keyword(&mut info, keyword, &values);
            }
            current = Some(token);
            values.clear();
        } else if current.is_some() {
            values.push(token.to_string());
        }
    }
    if let Some(keyword) = current {
        finish_keyword(&mut info, keyword, &values);
    }

    info
}

fn finish_keyword(info: &mut Info, keyword: &str, values: &[String]) {
    match keyword {
        "depth" => info.depth = first_number(values),
        "seldepth" => info.seldepth = first_number(values),
        "time" => info.time = first_number(values),
        "nodes" => info.nodes = first_number(values),
        "pv" => info.pv = Some(values.to_vec()),
        "multipv" => info.multipv = first_number(values),
        "score" => info.score = parse_score(values),
        "currmove" => info.currmove = values.first().cloned(),
        "currmovenumber" => info.currmovenumber = first_number(values),
        "bmc" => info.bmc = first_number(values),
        "hashfull" => info.hashfull = first_number(values),
        "nps" => info.nps = first_number(values),
        "tbhits" => info.tbhits = first_number(values),
        "sbhits" => info.sbhits = first_number(values),
        "cpuload" => info.cpuload = first_number(values),
        "string" => info.string = Some(values.join(" ")),
        "refutation" => info.refutation = Some(values.to_vec()),
        "currline" => info.currline = Some(values.to_vec()),
        _ => {}
    }
}

fn first_number<T: std::str::FromStr>(values: &[String]) -> Option<T> {
    values.first().and_then(|v| v.parse().ok())
}

/// `score cp N` or `score mate N`. Anything else is dropped so the parser
/// stays total; trailing `lowerbound`/`upperbound` markers are ignored.
fn parse_score(values: &[String]) -> Option<Score> {
    match (values.first().map(String::as_str), values.get(1)) {
        (Some("cp"), Some(n)) => n.parse().map(Score::Cp).ok(),
        (Some("mate"), Some(n)) => n.parse().map(Score::Mate).ok(),
        _ => None,
    }
}

fn split_move(mv: &str) -> Option<(String, String, Option<char>)> {
    let bytes = mv.as_bytes();
    if bytes.len() < 4 || bytes.len() > 5 {
        return None;
    }
    let from = mv.get(0..2)?;
    let to = mv.get(2..4)?;
    if !is_square(from) || !is_square(to) {
        return None;
    }
    let promotion = if bytes.len() == 5 {
        let p = bytes[4] as char;
        if !matches!(p, 'q' | 'r' | 'b' | 'n') {
            return None;
        }
        Some(p)
    } else {
        None
    };
    Some((from.to_string(), to.to_string(), promotion))
}

fn is_square(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 2 && (b'a'..=b'h').contains(&b[0]) && (b'1'..=b'8').contains(&b[1])
}

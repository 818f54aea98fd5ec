//! Line grammar: turns one line of script text into at most one `Command`.
//!
//! Rules are tried in the fixed order of `RULES`; the first one that accepts
//! the line wins.  A line whose head is one of the keywords is committed to
//! that keyword: if its rule rejects the line, the line is dropped instead of
//! being read as a `Name: color` country fill.  Parsing is lenient – a line no
//! rule accepts is simply skipped by `parse`.

use super::ast::*;
use super::lexer::{Field, fields};

type Rule = fn(&str) -> Result<Command, String>;

/// Keyword rules in priority order; the `Name: color` fallback comes after all of them.
const RULES: &[(&str, Rule)] = &[
    ("region", parse_region),
    ("line", parse_line_cmd),
    ("attack", parse_attack),
    ("bubble", parse_bubble),
    ("arrow", parse_arrow),
    ("year", parse_year),
    ("label", parse_label),
    ("legend", parse_legend),
    ("effect", parse_effect),
    ("remove", parse_remove),
    ("zoom", parse_zoom),
    ("cinematic", parse_cinematic),
    ("fly", parse_fly),
    ("wait", parse_wait),
    ("country", parse_country_keyword),
];

/// Split a full script into commands, keeping the 0-based line index of each.
///
/// Blank lines and `#` comments are ignored; lines that match no rule are
/// recorded in `Script::rejected_lines` and otherwise skipped.
pub fn parse(script: &str) -> Script {
    let mut out = Script::new();
    for (index, raw) in script.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Some(cmd) => out.push(cmd, index),
            None => {
                log::debug!("line {index}: no rule matches {line:?}");
                out.reject(index);
            }
        }
    }
    out
}

/// Parse one line; `None` when the line is blank, a comment, or matches no rule.
pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (head, args) = line.split_once(':')?;
    let keyword = head.trim().to_ascii_lowercase();

    for (name, rule) in RULES {
        if keyword == *name {
            return match rule(args.trim()) {
                Ok(cmd) => Some(cmd),
                Err(e) => {
                    log::trace!("{name}: {e}");
                    None
                }
            };
        }
    }

    parse_country(head.trim(), args.trim()).ok()
}

// ─────────────────────────────────────────────────────
// Shared field helpers
// ─────────────────────────────────────────────────────

/// Numeric literal of the shape `-?[0-9.]+`.
///
/// The value is the longest leading run that forms a float, so `1.2.3`
/// reads as `1.2` and `.` as NaN.
fn number(token: &str) -> Option<f64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let mut prefix = String::new();
    let mut seen_dot = false;
    let mut seen_digit = false;
    if token.starts_with('-') {
        prefix.push('-');
    }
    for c in digits.chars() {
        match c {
            '.' if !seen_dot => seen_dot = true,
            '.' => break,
            _ => seen_digit = true,
        }
        prefix.push(c);
    }
    if !seen_digit {
        return Some(f64::NAN);
    }
    Some(prefix.parse().unwrap_or(f64::NAN))
}

/// Same as `number` but without a sign.
fn unsigned(token: &str) -> Option<f64> {
    if token.starts_with('-') {
        return None;
    }
    number(token)
}

fn bare<'f>(fields: &'f [Field], idx: usize, what: &str) -> Result<&'f str, String> {
    fields
        .get(idx)
        .and_then(Field::bare)
        .ok_or_else(|| format!("expected {what} at field {}", idx + 1))
}

fn coordinate(fields: &[Field], idx: usize, what: &str) -> Result<f64, String> {
    let token = bare(fields, idx, what)?;
    number(token).ok_or_else(|| format!("invalid {what}: {token:?}"))
}

fn text(fields: &[Field], idx: usize) -> Result<String, String> {
    match fields.get(idx).and_then(Field::quoted) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(format!("expected quoted text at field {}", idx + 1)),
    }
}

fn color(token: &str) -> Result<String, String> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(format!("invalid color token {token:?}"));
    }
    Ok(token.to_string())
}

fn arity(fields: &[Field], min: usize, max: usize) -> Result<(), String> {
    if fields.len() < min || fields.len() > max {
        return Err(format!(
            "expected {min}..={max} fields, got {}",
            fields.len()
        ));
    }
    Ok(())
}

fn endpoint(token: &str) -> Result<Endpoint, String> {
    if token.is_empty() {
        return Err("empty endpoint".to_string());
    }
    let mut parts = token.split_whitespace();
    if let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) {
        if let (Some(lat), Some(lng)) = (number(a), number(b)) {
            return Ok(Endpoint::Coordinates { lat, lng });
        }
    }
    Ok(Endpoint::Territory(token.to_string()))
}

// ─────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────

fn parse_region(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 4)?;
    let name = bare(&f, 0, "region name")?;
    let country = bare(&f, 1, "country name")?;
    if name.is_empty() || country.is_empty() {
        return Err("region and country must not be empty".to_string());
    }
    let color = color(bare(&f, 2, "color")?)?;

    let mut animation = Animation::None;
    let mut occupied = false;
    if f.len() == 4 {
        let extra = bare(&f, 3, "occupied or animation")?;
        if extra.eq_ignore_ascii_case("occupied") {
            occupied = true;
        } else {
            animation = Animation::parse(extra)
                .ok_or_else(|| format!("unknown region modifier {extra:?}"))?;
        }
    }

    Ok(Command::Region {
        name: name.to_string(),
        country: country.to_string(),
        color,
        animation,
        occupied,
    })
}

/// `From, To, color[, …]` with empty fields dropped, shared by `line` and `attack`.
fn connector_fields(args: &str) -> Result<Vec<String>, String> {
    let f = fields(args)?;
    let mut parts = Vec::with_capacity(f.len());
    for field in &f {
        let part = field
            .bare()
            .ok_or_else(|| "quoted text is not allowed here".to_string())?;
        if !part.is_empty() {
            parts.push(part.to_string());
        }
    }
    Ok(parts)
}

fn parse_line_cmd(args: &str) -> Result<Command, String> {
    let parts = connector_fields(args)?;
    if parts.len() != 3 {
        return Err(format!("line takes 3 fields, got {}", parts.len()));
    }
    Ok(Command::Line {
        from: endpoint(&parts[0])?,
        to: endpoint(&parts[1])?,
        color: color(&parts[2])?,
    })
}

fn parse_attack(args: &str) -> Result<Command, String> {
    let parts = connector_fields(args)?;
    if !(3..=6).contains(&parts.len()) {
        return Err(format!("attack takes 3..=6 fields, got {}", parts.len()));
    }

    let opt_number = |idx: usize, what: &str| -> Result<Option<f64>, String> {
        parts
            .get(idx)
            .map(|p| number(p).ok_or_else(|| format!("invalid {what}: {p:?}")))
            .transpose()
    };

    let curve = opt_number(3, "curve")?.unwrap_or(DEFAULT_CURVE);
    let width = opt_number(4, "width")?.unwrap_or(DEFAULT_ARROW_WIDTH);
    let head_size = opt_number(5, "head size")?.unwrap_or(width);

    Ok(Command::Attack {
        from: endpoint(&parts[0])?,
        to: endpoint(&parts[1])?,
        color: color(&parts[2])?,
        curve,
        width,
        head_size,
    })
}

fn parse_bubble(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 4)?;
    let color = match f.get(3) {
        Some(_) => color(bare(&f, 3, "color")?)?,
        None => DEFAULT_BUBBLE_COLOR.to_string(),
    };
    Ok(Command::Bubble {
        lat: coordinate(&f, 0, "latitude")?,
        lng: coordinate(&f, 1, "longitude")?,
        text: text(&f, 2)?,
        color,
    })
}

fn parse_arrow(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 5)?;

    let (direction, color) = match f.len() {
        3 => (Direction::Right, DEFAULT_ARROW_COLOR.to_string()),
        4 => {
            let token = bare(&f, 3, "direction or color")?;
            match Direction::parse(token) {
                Some(dir) => (dir, DEFAULT_ARROW_COLOR.to_string()),
                None => (Direction::Right, color(token)?),
            }
        }
        _ => {
            let token = bare(&f, 3, "direction")?;
            let dir = Direction::parse(token).ok_or_else(|| format!("bad direction {token:?}"))?;
            (dir, color(bare(&f, 4, "color")?)?)
        }
    };

    Ok(Command::Arrow {
        lat: coordinate(&f, 0, "latitude")?,
        lng: coordinate(&f, 1, "longitude")?,
        text: text(&f, 2)?,
        direction,
        color,
    })
}

fn parse_year(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 1, 2)?;
    let highlight = match f.get(1) {
        None => false,
        Some(Field::Bare(flag)) if flag.eq_ignore_ascii_case("highlight") => true,
        Some(other) => return Err(format!("unexpected year flag {other:?}")),
    };
    Ok(Command::Year {
        text: text(&f, 0)?,
        highlight,
    })
}

fn parse_label(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 5)?;

    let size = match f.get(3) {
        None => DEFAULT_LABEL_SIZE,
        Some(_) => {
            let token = bare(&f, 3, "size")?;
            if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("invalid label size {token:?}"));
            }
            match token.parse::<u32>() {
                Ok(0) | Err(_) => DEFAULT_LABEL_SIZE,
                Ok(n) => n,
            }
        }
    };
    let color = match f.get(4) {
        Some(_) => Some(color(bare(&f, 4, "color")?)?),
        None => None,
    };

    Ok(Command::Label {
        lat: coordinate(&f, 0, "latitude")?,
        lng: coordinate(&f, 1, "longitude")?,
        text: text(&f, 2)?,
        size,
        color,
    })
}

fn parse_legend(args: &str) -> Result<Command, String> {
    if args.eq_ignore_ascii_case("auto") {
        return Ok(Command::Legend(Legend::Auto));
    }
    if args.eq_ignore_ascii_case("hide") {
        return Ok(Command::Legend(Legend::Hide));
    }

    let f = fields(args)?;
    arity(&f, 1, 2)?;
    let color = match f.get(1) {
        Some(_) => color(bare(&f, 1, "color")?)?,
        None => DEFAULT_BUBBLE_COLOR.to_string(),
    };
    Ok(Command::Legend(Legend::Entry {
        label: text(&f, 0)?,
        color,
    }))
}

fn parse_effect(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 5)?;

    let name = bare(&f, 2, "effect name")?;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(format!("invalid effect name {name:?}"));
    }
    let color = match f.get(3) {
        Some(_) => color(bare(&f, 3, "color")?)?,
        None => DEFAULT_EFFECT_COLOR.to_string(),
    };
    let size = match f.get(4) {
        None => DEFAULT_EFFECT_SIZE,
        Some(_) => {
            let token = bare(&f, 4, "size")?;
            match unsigned(token) {
                Some(v) if v.is_nan() || v == 0.0 => DEFAULT_EFFECT_SIZE,
                Some(v) => v,
                None => return Err(format!("invalid effect size {token:?}")),
            }
        }
    };

    Ok(Command::Effect {
        lat: coordinate(&f, 0, "latitude")?,
        lng: coordinate(&f, 1, "longitude")?,
        effect_name: name.to_lowercase(),
        color,
        size,
    })
}

fn parse_remove(args: &str) -> Result<Command, String> {
    let scope = match args.to_ascii_lowercase().as_str() {
        "last" => RemoveScope::Last,
        "arrows" => RemoveScope::Arrows,
        "effects" => RemoveScope::Effects,
        other => return Err(format!("unknown remove scope {other:?}")),
    };
    Ok(Command::Remove { scope })
}

fn parse_zoom(args: &str) -> Result<Command, String> {
    if args.is_empty() {
        return Err("zoom needs a target".to_string());
    }
    Ok(Command::Zoom {
        target: args.to_string(),
    })
}

fn parse_cinematic(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 5)?;

    let zoom_token = bare(&f, 2, "zoom")?;
    let zoom = unsigned(zoom_token).ok_or_else(|| format!("invalid zoom {zoom_token:?}"))?;
    let pitch = match f.get(3) {
        Some(_) => Some(coordinate(&f, 3, "pitch")?),
        None => None,
    };
    let bearing = match f.get(4) {
        Some(_) => Some(coordinate(&f, 4, "bearing")?),
        None => None,
    };

    Ok(Command::Cinematic {
        lat: coordinate(&f, 0, "latitude")?,
        lng: coordinate(&f, 1, "longitude")?,
        zoom,
        pitch,
        bearing,
    })
}

fn parse_fly(args: &str) -> Result<Command, String> {
    let f = fields(args)?;
    arity(&f, 3, 3)?;
    let zoom_token = bare(&f, 2, "zoom")?;
    Ok(Command::Fly {
        lat: coordinate(&f, 0, "latitude")?,
        lng: coordinate(&f, 1, "longitude")?,
        zoom: unsigned(zoom_token).ok_or_else(|| format!("invalid zoom {zoom_token:?}"))?,
    })
}

fn parse_wait(args: &str) -> Result<Command, String> {
    let lower = args.to_ascii_lowercase();
    let (value, scale) = if let Some(v) = lower.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = lower.strip_suffix('s') {
        (v, 1000.0)
    } else {
        (lower.as_str(), 1000.0)
    };

    let amount = unsigned(value).ok_or_else(|| format!("invalid duration {args:?}"))?;
    // NaN saturates to 0.
    let ms = (amount * scale).round() as u64;
    Ok(Command::Wait { ms })
}

/// `country: Name, color[, animation]`, the explicit form of the fallback.
fn parse_country_keyword(args: &str) -> Result<Command, String> {
    let (name, rest) = args
        .split_once(',')
        .ok_or_else(|| "expected `Name, color`".to_string())?;
    parse_country(name.trim(), rest.trim())
}

/// Fallback: `Name: color[, animation]`.
fn parse_country(name: &str, args: &str) -> Result<Command, String> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '\''))
    {
        return Err(format!("invalid territory name {name:?}"));
    }

    let f = fields(args)?;
    arity(&f, 1, 2)?;
    let color = color(bare(&f, 0, "color")?)?;
    let animation = match f.get(1) {
        Some(_) => {
            let token = bare(&f, 1, "animation")?;
            Animation::parse(token).ok_or_else(|| format!("unknown animation {token:?}"))?
        }
        None => Animation::None,
    };

    Ok(Command::Country {
        name: name.to_string(),
        color,
        animation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number() {
        let test_cases = vec![
            ("48.8", Some(48.8)),
            ("-13", Some(-13.0)),
            ("1.2.3", Some(1.2)),
            ("5.", Some(5.0)),
            (".5", Some(0.5)),
            ("abc", None),
            ("-", None),
            ("", None),
            ("1e5", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(number(input), expected, "input: {input}");
        }
        assert!(number(".").unwrap().is_nan());
        assert!(number("-.").unwrap().is_nan());
    }

    #[test]
    fn test_parse_country() {
        let test_cases = vec![
            (
                "france: blue, pulse",
                Some(Command::Country {
                    name: "france".into(),
                    color: "blue".into(),
                    animation: Animation::Pulse,
                }),
            ),
            (
                "United States: #ff0000",
                Some(Command::Country {
                    name: "United States".into(),
                    color: "#ff0000".into(),
                    animation: Animation::None,
                }),
            ),
            (
                "Guinea-Bissau: red, SWEEP",
                Some(Command::Country {
                    name: "Guinea-Bissau".into(),
                    color: "red".into(),
                    animation: Animation::Sweep,
                }),
            ),
            ("france: blue, wobble", None),
            ("france: dark blue", None),
            ("france:", None),
            ("just some words", None),
            ("(weird): red", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_parse_region() {
        let test_cases = vec![
            (
                "region: Crimea, Ukraine, red, occupied",
                Some(Command::Region {
                    name: "Crimea".into(),
                    country: "Ukraine".into(),
                    color: "red".into(),
                    animation: Animation::None,
                    occupied: true,
                }),
            ),
            (
                "REGION: Bavaria, Germany, gold, fade",
                Some(Command::Region {
                    name: "Bavaria".into(),
                    country: "Germany".into(),
                    color: "gold".into(),
                    animation: Animation::Fade,
                    occupied: false,
                }),
            ),
            ("region: Bavaria, Germany", None),
            ("region: Bavaria, Germany, gold, sideways", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_parse_markers() {
        let test_cases = vec![
            (
                "bubble: 48.8, 2.3, \"Paris, at last\"",
                Some(Command::Bubble {
                    lat: 48.8,
                    lng: 2.3,
                    text: "Paris, at last".into(),
                    color: "blue".into(),
                }),
            ),
            (
                "arrow: 40, 45, \"Advance\", left, red",
                Some(Command::Arrow {
                    lat: 40.0,
                    lng: 45.0,
                    text: "Advance".into(),
                    direction: Direction::Left,
                    color: "red".into(),
                }),
            ),
            (
                "arrow: 1, 2, \"x\"",
                Some(Command::Arrow {
                    lat: 1.0,
                    lng: 2.0,
                    text: "x".into(),
                    direction: Direction::Right,
                    color: "white".into(),
                }),
            ),
            (
                "arrow: 1, 2, \"x\", left",
                Some(Command::Arrow {
                    lat: 1.0,
                    lng: 2.0,
                    text: "x".into(),
                    direction: Direction::Left,
                    color: "white".into(),
                }),
            ),
            (
                "arrow: 40, 45, \"Advance\", red",
                Some(Command::Arrow {
                    lat: 40.0,
                    lng: 45.0,
                    text: "Advance".into(),
                    direction: Direction::Right,
                    color: "red".into(),
                }),
            ),
            (
                "label: -33.9, 18.4, \"Cape Town\", 18",
                Some(Command::Label {
                    lat: -33.9,
                    lng: 18.4,
                    text: "Cape Town".into(),
                    size: 18,
                    color: None,
                }),
            ),
            (
                "label: 1, 2, \"x\"",
                Some(Command::Label {
                    lat: 1.0,
                    lng: 2.0,
                    text: "x".into(),
                    size: 14,
                    color: None,
                }),
            ),
            (
                "effect: 50.4, 30.5, Explosion",
                Some(Command::Effect {
                    lat: 50.4,
                    lng: 30.5,
                    effect_name: "explosion".into(),
                    color: "red".into(),
                    size: 1.0,
                }),
            ),
            (
                "effect: 50.4, 30.5, tank, navy, 1.5",
                Some(Command::Effect {
                    lat: 50.4,
                    lng: 30.5,
                    effect_name: "tank".into(),
                    color: "navy".into(),
                    size: 1.5,
                }),
            ),
            ("bubble: 48.8, 2.3, \"\"", None),
            ("bubble: 48.8, 2.3, Paris", None),
            ("label: 1, 2, \"x\", big", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_parse_camera() {
        let test_cases = vec![
            (
                "zoom: Nagorno-Karabakh",
                Some(Command::Zoom {
                    target: "Nagorno-Karabakh".into(),
                }),
            ),
            (
                "fly: 40.1, 46.5, 6",
                Some(Command::Fly {
                    lat: 40.1,
                    lng: 46.5,
                    zoom: 6.0,
                }),
            ),
            (
                "cinematic: 40, 46, 6.5, 40, -20",
                Some(Command::Cinematic {
                    lat: 40.0,
                    lng: 46.0,
                    zoom: 6.5,
                    pitch: Some(40.0),
                    bearing: Some(-20.0),
                }),
            ),
            (
                "cinematic: 40, 46, 6",
                Some(Command::Cinematic {
                    lat: 40.0,
                    lng: 46.0,
                    zoom: 6.0,
                    pitch: None,
                    bearing: None,
                }),
            ),
            ("fly: 40, 46", None),
            ("fly: 40, 46, -2", None),
            ("zoom:", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_parse_wait() {
        let test_cases = vec![
            ("wait: 500ms", Some(500)),
            ("wait: 3s", Some(3000)),
            ("wait: 2", Some(2000)),
            ("wait: 1.5s", Some(1500)),
            ("WAIT: 250MS", Some(250)),
            ("wait: soon", None),
            ("wait: -1s", None),
        ];

        for (input, expected) in test_cases {
            let expected = expected.map(|ms| Command::Wait { ms });
            assert_eq!(parse_line(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_keywords_never_fall_back() {
        // Broken keyword lines are dropped, not read as a country called "wait".
        for input in [
            "wait: red",
            "year: 1999",
            "zoom",
            "remove: everything",
            "country: red",
        ] {
            assert_eq!(parse_line(input), None, "input: {input}");
        }
    }

    #[test]
    fn test_explicit_country_keyword() {
        assert_eq!(
            parse_line("country: Atlantis, red"),
            Some(Command::Country {
                name: "Atlantis".into(),
                color: "red".into(),
                animation: Animation::None,
            })
        );
        assert_eq!(
            parse_line("Country: South Korea, #00ff00, sweep"),
            Some(Command::Country {
                name: "South Korea".into(),
                color: "#00ff00".into(),
                animation: Animation::Sweep,
            })
        );
    }

    #[test]
    fn test_legend_and_remove() {
        let test_cases = vec![
            ("legend: auto", Some(Command::Legend(Legend::Auto))),
            ("legend: HIDE", Some(Command::Legend(Legend::Hide))),
            (
                "legend: \"Azerbaijan\", blue",
                Some(Command::Legend(Legend::Entry {
                    label: "Azerbaijan".into(),
                    color: "blue".into(),
                })),
            ),
            (
                "remove: arrows",
                Some(Command::Remove {
                    scope: RemoveScope::Arrows,
                }),
            ),
            (
                "remove: Effects",
                Some(Command::Remove {
                    scope: RemoveScope::Effects,
                }),
            ),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_line(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_comments_and_blanks() {
        for input in ["", "   ", "# france: red", "  # note"] {
            assert_eq!(parse_line(input), None, "input: {input:?}");
        }
    }
}

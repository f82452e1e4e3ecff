//! Number format codes.
//!
//! Produces the text a spreadsheet application would show for a numeric cell.
//! Supported: General, fixed and optional decimals, thousands grouping and
//! scaling, percent, scientific notation, quoted literals, and date/time
//! codes in both the 1900 and 1904 date systems.
//!
//! Codes can carry up to four `;`-separated sections
//! (`positive;negative;zero;text`). Color and condition brackets such as
//! `[Red]` or `[>100]` are dropped; the text section is never used because
//! only numbers are formatted here.

/// Built-in number format IDs (0-49 are predefined by Excel)
/// See: ECMA-376 Part 1, Section 18.8.30
pub const fn get_builtin_format(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        5 => Some("$#,##0_);($#,##0)"),
        6 => Some("$#,##0_);[Red]($#,##0)"),
        7 => Some("$#,##0.00_);($#,##0.00)"),
        8 => Some("$#,##0.00_);[Red]($#,##0.00)"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("m/d/yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        41 => Some("_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)"),
        42 => Some("_($* #,##0_);_($* (#,##0);_($* \"-\"_);_(@_)"),
        43 => Some("_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)"),
        44 => Some("_($* #,##0.00_);_($* (#,##0.00);_($* \"-\"??_);_(@_)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

/// A format code split into sections and pre-parsed for repeated use.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFormat {
    positive: Section,
    negative: Option<Section>,
    zero: Option<Section>,
}

impl CompiledFormat {
    pub fn general() -> Self {
        Self {
            positive: Section::General,
            negative: None,
            zero: None,
        }
    }

    pub fn is_general(&self) -> bool {
        self.positive == Section::General && self.negative.is_none() && self.zero.is_none()
    }

    /// Whether the first section renders dates or times.
    pub fn is_date(&self) -> bool {
        matches!(self.positive, Section::Date(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Section {
    General,
    /// Literal-only section such as `"-"`
    Literal(String),
    Numeric(NumericFormat),
    Scientific(ScientificFormat),
    Date(DateFormat),
}

#[derive(Debug, Clone, PartialEq, Default)]
struct NumericFormat {
    prefix: String,
    suffix: String,
    int_zeros: usize,
    frac_zeros: usize,
    frac_optional: usize,
    has_point: bool,
    grouping: bool,
    /// Number of trailing commas; each divides by 1000
    scale_thousands: u32,
    percent: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ScientificFormat {
    prefix: String,
    decimals: usize,
    exp_digits: usize,
    plus_sign: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct DateFormat {
    tokens: Vec<DateToken>,
    twelve_hour: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum DateToken {
    Year4,
    Year2,
    Month,
    Month2,
    MonthAbbr,
    MonthFull,
    MonthLetter,
    Day,
    Day2,
    DayAbbr,
    DayFull,
    Hour,
    Hour2,
    Minute,
    Minute2,
    Second,
    Second2,
    ElapsedHours,
    /// Tenths/hundredths/... of a second after `ss`
    SubSecond(usize),
    AmPm { short: bool, lower: bool },
    Literal(String),
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Compile a format code. Unrecognized syntax degrades to literal text or
/// General rather than failing.
pub fn compile_format_code(format_code: &str) -> CompiledFormat {
    let mut sections = split_sections(format_code.trim()).into_iter();
    let positive = sections
        .next()
        .map_or(Section::General, |s| compile_section(&s));
    let negative = sections.next().map(|s| compile_section(&s));
    let zero = sections.next().map(|s| compile_section(&s));
    CompiledFormat {
        positive,
        negative,
        zero,
    }
}

/// Format a number with a format code.
pub fn format_number(value: f64, format_code: &str, date1904: bool) -> String {
    format_number_compiled(value, &compile_format_code(format_code), date1904)
}

/// Format a number with an already compiled code.
pub fn format_number_compiled(value: f64, compiled: &CompiledFormat, date1904: bool) -> String {
    if !value.is_finite() {
        return format_general(value);
    }
    if value < 0.0 {
        if let Some(negative) = &compiled.negative {
            // The negative section carries its own sign decoration.
            return format_section(-value, negative, date1904);
        }
        if let Section::Date(_) = compiled.positive {
            return format_general(value);
        }
        let text = format_section(-value, &compiled.positive, date1904);
        return if text.chars().any(|c| c.is_ascii_digit() && c != '0') {
            format!("-{text}")
        } else {
            text
        };
    }
    if value == 0.0 {
        if let Some(zero) = &compiled.zero {
            return format_section(value, zero, date1904);
        }
    }
    format_section(value, &compiled.positive, date1904)
}

fn format_section(value: f64, section: &Section, date1904: bool) -> String {
    match section {
        Section::General => format_general(value),
        Section::Literal(text) => text.clone(),
        Section::Numeric(fmt) => format_numeric(value, fmt),
        Section::Scientific(fmt) => format_scientific(value, fmt),
        Section::Date(fmt) => format_date(value, fmt, date1904),
    }
}

/// General format: integers without decimals, otherwise rounded to ten
/// significant digits with trailing zeros trimmed; scientific for very
/// large or tiny values.
#[allow(clippy::cast_possible_truncation)]
pub fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e11 {
        format!("{}", value as i64)
    } else if value.abs() >= 1e11 || (value.abs() < 1e-9 && value != 0.0) {
        format_exponent(value, 5, 2, true)
    } else {
        let exponent = value.abs().log10().floor() as i32;
        let decimals = usize::try_from(GENERAL_DIGITS - 1 - exponent).unwrap_or(0);
        let s = format!("{value:.decimals$}");
        if !s.contains('.') {
            return s;
        }
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Significant digits shown by the General format.
const GENERAL_DIGITS: i32 = 10;

/// Split on `;` outside quotes, brackets and escapes.
fn split_sections(code: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;

    for c in code.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if !in_quotes => {
                escaped = true;
                current.push(c);
            }
            '"' if !in_brackets => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '[' if !in_quotes => {
                in_brackets = true;
                current.push(c);
            }
            ']' if !in_quotes => {
                in_brackets = false;
                current.push(c);
            }
            ';' if !in_quotes && !in_brackets => {
                sections.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    sections.push(current);
    sections
}

/// Lexical pieces of one section.
#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    /// Bracket content such as `h` in `[h]`; colors and conditions are dropped
    Bracket(String),
    Char(char),
}

fn lex_section(section: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut chars = section.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let mut text = String::new();
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                    text.push(q);
                }
                pieces.push(Piece::Literal(text));
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    pieces.push(Piece::Literal(next.to_string()));
                }
            }
            '_' => {
                // Padding the width of the next char
                if chars.next().is_some() {
                    pieces.push(Piece::Literal(" ".to_string()));
                }
            }
            '*' => {
                chars.next();
            }
            '[' => {
                let mut inner = String::new();
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                    inner.push(b);
                }
                let lower = inner.to_ascii_lowercase();
                if let Some(symbol) = inner.strip_prefix('$') {
                    // [$€-407] currency/locale: keep the symbol part
                    let symbol = symbol.split('-').next().unwrap_or("");
                    if !symbol.is_empty() {
                        pieces.push(Piece::Literal(symbol.to_string()));
                    }
                } else if lower.chars().all(|ch| matches!(ch, 'h' | 'm' | 's')) && !lower.is_empty()
                {
                    pieces.push(Piece::Bracket(lower));
                }
            }
            _ => pieces.push(Piece::Char(c)),
        }
    }

    pieces
}

fn compile_section(section: &str) -> Section {
    let trimmed = section.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("general") || trimmed == "@" {
        return Section::General;
    }

    let pieces = lex_section(section);
    let has_general = section.to_ascii_lowercase().contains("general");
    if has_general {
        return Section::General;
    }

    if is_date_section(&pieces) {
        return Section::Date(compile_date(&pieces));
    }

    let has_placeholder = pieces
        .iter()
        .any(|p| matches!(p, Piece::Char('0' | '#' | '?')));
    if !has_placeholder {
        let text: String = pieces
            .iter()
            .map(|p| match p {
                Piece::Literal(s) => s.clone(),
                Piece::Char('@') | Piece::Bracket(_) => String::new(),
                Piece::Char(c) => c.to_string(),
            })
            .collect();
        return Section::Literal(text);
    }

    if pieces
        .iter()
        .any(|p| matches!(p, Piece::Char('E' | 'e')))
    {
        return Section::Scientific(compile_scientific(&pieces));
    }

    Section::Numeric(compile_numeric(&pieces))
}

fn is_date_section(pieces: &[Piece]) -> bool {
    pieces.iter().any(|p| match p {
        Piece::Bracket(_) => true,
        Piece::Char(c) => matches!(c.to_ascii_lowercase(), 'y' | 'd' | 'h' | 'm' | 's'),
        Piece::Literal(_) => false,
    }) && !pieces
        .iter()
        .any(|p| matches!(p, Piece::Char('#' | '?' | '%')))
}

fn compile_numeric(pieces: &[Piece]) -> NumericFormat {
    let mut fmt = NumericFormat::default();
    let mut seen_digit = false;
    let mut pending_commas: u32 = 0;

    for piece in pieces {
        match piece {
            Piece::Char(c @ ('0' | '#' | '?')) => {
                if pending_commas > 0 && !fmt.has_point {
                    fmt.grouping = true;
                }
                pending_commas = 0;
                seen_digit = true;
                if fmt.has_point {
                    if *c == '0' {
                        fmt.frac_zeros += 1 + fmt.frac_optional;
                        fmt.frac_optional = 0;
                    } else {
                        fmt.frac_optional += 1;
                    }
                } else if *c == '0' {
                    fmt.int_zeros += 1;
                }
            }
            Piece::Char('.') if seen_digit || !fmt.has_point => {
                fmt.has_point = true;
                seen_digit = true;
            }
            Piece::Char(',') if seen_digit => pending_commas += 1,
            Piece::Char('%') => {
                fmt.percent += 1;
                push_literal(&mut fmt, seen_digit, "%");
            }
            Piece::Literal(text) => push_literal(&mut fmt, seen_digit, text),
            Piece::Char(c) => push_literal(&mut fmt, seen_digit, &c.to_string()),
            Piece::Bracket(_) => {}
        }
    }
    fmt.scale_thousands = pending_commas;
    fmt
}

fn push_literal(fmt: &mut NumericFormat, after_digits: bool, text: &str) {
    if after_digits {
        fmt.suffix.push_str(text);
    } else {
        fmt.prefix.push_str(text);
    }
}

fn compile_scientific(pieces: &[Piece]) -> ScientificFormat {
    let mut fmt = ScientificFormat::default();
    let mut in_frac = false;
    let mut in_exp = false;
    let mut seen_digit = false;

    for piece in pieces {
        match piece {
            Piece::Char('E' | 'e') => in_exp = true,
            Piece::Char('+') if in_exp => fmt.plus_sign = true,
            Piece::Char('0' | '#' | '?') if in_exp => fmt.exp_digits += 1,
            Piece::Char('0' | '#' | '?') => {
                seen_digit = true;
                if in_frac {
                    fmt.decimals += 1;
                }
            }
            Piece::Char('.') => in_frac = true,
            Piece::Literal(text) if !seen_digit => fmt.prefix.push_str(text),
            _ => {}
        }
    }
    fmt
}

fn compile_date(pieces: &[Piece]) -> DateFormat {
    let mut tokens: Vec<DateToken> = Vec::new();
    let mut twelve_hour = false;
    let mut i = 0;

    while let Some(piece) = pieces.get(i) {
        match piece {
            Piece::Literal(text) => tokens.push(DateToken::Literal(text.clone())),
            Piece::Bracket(inner) => match inner.chars().next() {
                Some('h') => tokens.push(DateToken::ElapsedHours),
                Some('m') => tokens.push(DateToken::Minute2),
                _ => tokens.push(DateToken::Second2),
            },
            Piece::Char(c) => {
                let lower = c.to_ascii_lowercase();
                if lower == 'a' {
                    if let Some((token, used)) = match_ampm(pieces, i) {
                        twelve_hour = true;
                        tokens.push(token);
                        i += used;
                        continue;
                    }
                }
                if matches!(lower, 'y' | 'm' | 'd' | 'h' | 's') {
                    let run = run_length(pieces, i, lower);
                    tokens.push(date_token(lower, run));
                    i += run;
                    continue;
                }
                if *c == '.' && matches!(tokens.last(), Some(DateToken::Second | DateToken::Second2))
                {
                    let zeros = run_length(pieces, i + 1, '0');
                    if zeros > 0 {
                        tokens.push(DateToken::SubSecond(zeros));
                        i += 1 + zeros;
                        continue;
                    }
                }
                tokens.push(DateToken::Literal(c.to_string()));
            }
        }
        i += 1;
    }

    resolve_minutes(&mut tokens);
    DateFormat {
        tokens,
        twelve_hour,
    }
}

fn run_length(pieces: &[Piece], start: usize, lower: char) -> usize {
    pieces
        .iter()
        .skip(start)
        .take_while(|p| matches!(p, Piece::Char(c) if c.to_ascii_lowercase() == lower))
        .count()
}

fn match_ampm(pieces: &[Piece], start: usize) -> Option<(DateToken, usize)> {
    let text: String = pieces
        .iter()
        .skip(start)
        .take(5)
        .map_while(|p| match p {
            Piece::Char(c) => Some(*c),
            _ => None,
        })
        .collect();
    let lower = text.starts_with('a');
    let folded = text.to_ascii_uppercase();
    if folded.starts_with("AM/PM") {
        Some((DateToken::AmPm { short: false, lower }, 5))
    } else if folded.starts_with("A/P") {
        Some((DateToken::AmPm { short: true, lower }, 3))
    } else {
        None
    }
}

fn date_token(lower: char, run: usize) -> DateToken {
    match (lower, run) {
        ('y', 1 | 2) => DateToken::Year2,
        ('y', _) => DateToken::Year4,
        ('m', 1) => DateToken::Month,
        ('m', 2) => DateToken::Month2,
        ('m', 3) => DateToken::MonthAbbr,
        ('m', 5) => DateToken::MonthLetter,
        ('m', _) => DateToken::MonthFull,
        ('d', 1) => DateToken::Day,
        ('d', 2) => DateToken::Day2,
        ('d', 3) => DateToken::DayAbbr,
        ('d', _) => DateToken::DayFull,
        ('h', 1) => DateToken::Hour,
        ('h', _) => DateToken::Hour2,
        ('s', 1) => DateToken::Second,
        _ => DateToken::Second2,
    }
}

/// `m`/`mm` right after an hour or right before a second means minutes.
fn resolve_minutes(tokens: &mut [DateToken]) {
    for idx in 0..tokens.len() {
        let Some(token) = tokens.get(idx) else {
            continue;
        };
        if !matches!(token, DateToken::Month | DateToken::Month2) {
            continue;
        }
        let prev = tokens
            .iter()
            .take(idx)
            .rev()
            .find(|t| !matches!(t, DateToken::Literal(_)));
        let next = tokens
            .iter()
            .skip(idx + 1)
            .find(|t| !matches!(t, DateToken::Literal(_)));
        let after_hour = matches!(
            prev,
            Some(DateToken::Hour | DateToken::Hour2 | DateToken::ElapsedHours)
        );
        let before_second = matches!(next, Some(DateToken::Second | DateToken::Second2));
        if after_hour || before_second {
            if let Some(slot) = tokens.get_mut(idx) {
                *slot = if matches!(slot, DateToken::Month) {
                    DateToken::Minute
                } else {
                    DateToken::Minute2
                };
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn format_numeric(value: f64, fmt: &NumericFormat) -> String {
    let mut scaled = value * 100f64.powi(fmt.percent as i32);
    if fmt.scale_thousands > 0 {
        scaled /= 1000f64.powi(fmt.scale_thousands as i32);
    }

    let decimals = fmt.frac_zeros + fmt.frac_optional;
    // Half away from zero, as spreadsheets round; fmt rounds half to even.
    if decimals <= 15 {
        let factor = 10f64.powi(decimals as i32);
        scaled = (scaled * factor).round() / factor;
    }
    let rendered = format!("{scaled:.decimals$}");
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, ""));

    let mut int_digits = int_part.trim_start_matches('0').to_string();
    while int_digits.len() < fmt.int_zeros {
        int_digits.insert(0, '0');
    }
    if fmt.grouping {
        int_digits = group_thousands(&int_digits);
    }

    let mut frac = frac_part.to_string();
    while frac.len() > fmt.frac_zeros && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::with_capacity(fmt.prefix.len() + int_digits.len() + frac.len() + 4);
    out.push_str(&fmt.prefix);
    out.push_str(&int_digits);
    if fmt.has_point && (decimals > 0 || fmt.frac_zeros > 0) {
        if !frac.is_empty() || fmt.frac_optional > 0 {
            out.push('.');
        }
        out.push_str(&frac);
    }
    out.push_str(&fmt.suffix);
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_scientific(value: f64, fmt: &ScientificFormat) -> String {
    let mut out = fmt.prefix.clone();
    out.push_str(&format_exponent(
        value,
        fmt.decimals,
        fmt.exp_digits.max(1),
        fmt.plus_sign,
    ));
    out
}

/// Mantissa with `decimals` digits, then `E`, sign and zero-padded exponent.
fn format_exponent(value: f64, decimals: usize, exp_digits: usize, plus_sign: bool) -> String {
    let rendered = format!("{value:.decimals$e}");
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((&rendered, "0"));
    let exp: i32 = exponent.parse().unwrap_or(0);
    let sign = if exp < 0 {
        "-"
    } else if plus_sign {
        "+"
    } else {
        ""
    };
    let mantissa = if decimals == 5 && mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format!(
        "{mantissa}E{sign}{:0width$}",
        exp.unsigned_abs(),
        width = exp_digits
    )
}

/// Calendar fields of a date serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts {
    year: i64,
    month: u32,
    day: u32,
    weekday: u32,
    hour: u32,
    minute: u32,
    second: u32,
    /// Sub-second remainder in milliseconds
    millis: u32,
    total_hours: i64,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn date_parts(serial: f64, date1904: bool) -> DateParts {
    let total_ms = (serial * 86_400_000.0).round() as i64;
    let days = total_ms.div_euclid(86_400_000);
    let ms_of_day = total_ms.rem_euclid(86_400_000);
    let secs = ms_of_day / 1000;

    // 1900 system: serial 60 is the phantom 1900-02-29 Excel keeps for
    // Lotus compatibility. Unix day for 1899-12-31 is -25_568.
    let (year, month, day, unix_day) = if date1904 {
        let unix_day = days - 24_107;
        let (y, m, d) = civil_from_days(unix_day);
        (y, m, d, unix_day)
    } else if days == 60 {
        (1900, 2, 29, -25_508)
    } else {
        let offset = if days < 60 { 25_568 } else { 25_569 };
        let unix_day = days - offset;
        let (y, m, d) = civil_from_days(unix_day);
        (y, m, d, unix_day)
    };

    DateParts {
        year,
        month,
        day,
        // 1970-01-01 was a Thursday
        weekday: (unix_day + 4).rem_euclid(7) as u32,
        hour: (secs / 3600) as u32,
        minute: ((secs % 3600) / 60) as u32,
        second: (secs % 60) as u32,
        millis: (ms_of_day % 1000) as u32,
        total_hours: days * 24 + secs / 3600,
    }
}

/// Days since 1970-01-01 to proleptic Gregorian (year, month, day).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn format_date(value: f64, fmt: &DateFormat, date1904: bool) -> String {
    let parts = date_parts(value, date1904);
    let month_name = MONTHS
        .get(parts.month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("");
    let weekday_name = WEEKDAYS.get(parts.weekday as usize).copied().unwrap_or("");
    let hour12 = match parts.hour % 12 {
        0 => 12,
        h => h,
    };
    let hour = if fmt.twelve_hour { hour12 } else { parts.hour };

    let mut out = String::new();
    for token in &fmt.tokens {
        match token {
            DateToken::Year4 => out.push_str(&format!("{:04}", parts.year)),
            DateToken::Year2 => out.push_str(&format!("{:02}", parts.year.rem_euclid(100))),
            DateToken::Month => out.push_str(&parts.month.to_string()),
            DateToken::Month2 => out.push_str(&format!("{:02}", parts.month)),
            DateToken::MonthAbbr => out.push_str(month_name.get(..3).unwrap_or(month_name)),
            DateToken::MonthFull => out.push_str(month_name),
            DateToken::MonthLetter => out.push_str(month_name.get(..1).unwrap_or(month_name)),
            DateToken::Day => out.push_str(&parts.day.to_string()),
            DateToken::Day2 => out.push_str(&format!("{:02}", parts.day)),
            DateToken::DayAbbr => out.push_str(weekday_name.get(..3).unwrap_or(weekday_name)),
            DateToken::DayFull => out.push_str(weekday_name),
            DateToken::Hour => out.push_str(&hour.to_string()),
            DateToken::Hour2 => out.push_str(&format!("{hour:02}")),
            DateToken::Minute => out.push_str(&parts.minute.to_string()),
            DateToken::Minute2 => out.push_str(&format!("{:02}", parts.minute)),
            DateToken::Second => out.push_str(&parts.second.to_string()),
            DateToken::Second2 => out.push_str(&format!("{:02}", parts.second)),
            DateToken::ElapsedHours => out.push_str(&parts.total_hours.to_string()),
            DateToken::SubSecond(digits) => {
                let millis = format!("{:03}", parts.millis);
                out.push('.');
                out.push_str(millis.get(..(*digits).min(3)).unwrap_or(&millis));
            }
            DateToken::AmPm { short, lower } => {
                let text = match (parts.hour < 12, short) {
                    (true, false) => "AM",
                    (false, false) => "PM",
                    (true, true) => "A",
                    (false, true) => "P",
                };
                if *lower {
                    out.push_str(&text.to_ascii_lowercase());
                } else {
                    out.push_str(text);
                }
            }
            DateToken::Literal(text) => out.push_str(text),
        }
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(10.0, "10" ; "integer")]
    #[test_case(0.1, "0.1" ; "decimal")]
    #[test_case(1.0 / 3.0, "0.3333333333" ; "repeating")]
    #[test_case(-42.5, "-42.5" ; "negative")]
    #[test_case(123_456_789.123, "123456789.1" ; "nine integer digits")]
    #[test_case(1_234_567.891_234, "1234567.891" ; "seven integer digits")]
    #[test_case(0.1 + 0.2, "0.3" ; "binary noise")]
    #[test_case(1_234_567_890.4, "1234567890" ; "no room for decimals")]
    #[test_case(0.000_012_345_678_901_23, "0.0000123456789" ; "small fraction")]
    #[test_case(123_456_789_012.0, "1.23457E+11" ; "large")]
    fn general(value: f64, expected: &str) {
        assert_eq!(format_general(value), expected);
    }

    #[test_case(1234.5, "0", "1235" ; "rounded integer")]
    #[test_case(1234.5, "0.00", "1234.50" ; "fixed decimals")]
    #[test_case(1_234_567.891, "#,##0.00", "1,234,567.89" ; "grouping")]
    #[test_case(0.256, "0%", "26%" ; "percent")]
    #[test_case(0.256, "0.0%", "25.6%" ; "percent decimals")]
    #[test_case(1_500_000.0, "#,##0,", "1,500" ; "thousands scaling")]
    #[test_case(0.5, "#.##", ".5" ; "optional digits")]
    #[test_case(42.0, "\"Total: \"0", "Total: 42" ; "quoted prefix")]
    #[test_case(12_345.0, "0.00E+00", "1.23E+04" ; "scientific")]
    #[test_case(1234.0, "$#,##0_);($#,##0)", "$1,234 " ; "currency padding")]
    fn numeric(value: f64, code: &str, expected: &str) {
        assert_eq!(format_number(value, code, false), expected);
    }

    #[test]
    fn negative_section_replaces_sign() {
        assert_eq!(format_number(-1234.0, "#,##0;(#,##0)", false), "(1,234)");
        assert_eq!(format_number(-5.0, "0.0", false), "-5.0");
        assert_eq!(format_number(0.0, "0;-0;\"zero\"", false), "zero");
        assert_eq!(format_number(-0.001, "0", false), "0");
    }

    #[test_case(45_000.0, "yyyy-mm-dd", "2023-03-15" ; "iso date")]
    #[test_case(45_000.0, "m/d/yy", "3/15/23" ; "builtin 14")]
    #[test_case(45_000.0, "d-mmm-yy", "15-Mar-23" ; "month abbreviation")]
    #[test_case(45_000.0, "dddd, mmmm d", "Wednesday, March 15" ; "long names")]
    #[test_case(45_000.75, "h:mm AM/PM", "6:00 PM" ; "twelve hour")]
    #[test_case(45_000.5, "hh:mm:ss", "12:00:00" ; "twenty four hour")]
    #[test_case(1.5, "[h]:mm", "36:00" ; "elapsed hours")]
    #[test_case(60.0, "yyyy-mm-dd", "1900-02-29" ; "phantom leap day")]
    #[test_case(61.0, "yyyy-mm-dd", "1900-03-01" ; "after phantom day")]
    #[test_case(1.0, "yyyy-mm-dd", "1900-01-01" ; "epoch")]
    fn dates(value: f64, code: &str, expected: &str) {
        assert_eq!(format_number(value, code, false), expected);
    }

    #[test]
    fn date1904_epoch() {
        assert_eq!(format_number(0.0, "yyyy-mm-dd", true), "1904-01-01");
        assert_eq!(format_number(43_538.0, "yyyy-mm-dd", true), "2023-03-15");
    }

    #[test]
    fn minutes_after_hours() {
        assert_eq!(format_number(0.5 + 5.0 / 1440.0, "h:mm", false), "12:05");
        assert_eq!(format_number(30.0 / 86_400.0, "mm:ss", false), "00:30");
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(get_builtin_format(14), Some("m/d/yy"));
        assert_eq!(get_builtin_format(9), Some("0%"));
        assert_eq!(get_builtin_format(100), None);
        assert!(compile_format_code("General").is_general());
        assert!(compile_format_code("mmm-yy").is_date());
        assert!(!compile_format_code("0.00").is_date());
    }
}

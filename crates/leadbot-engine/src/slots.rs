// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-slot extraction from free-form Russian text.
//!
//! Accepts informal scheduling language without an NLP stack. False
//! negatives are acceptable (the engine re-prompts); false positives with a
//! wrong hour are not, hence strict range validation before acceptance.

use std::sync::OnceLock;

use regex::Regex;

use leadbot_core::{Day, TimeSlot};

const TODAY_KEYWORDS: &[&str] = &["сегодня"];
const TOMORROW_KEYWORDS: &[&str] = &["завтра"];

/// Number words mapping to base hours 1-12, plus the two fixed words.
const WORD_HOURS: &[(&str, u32)] = &[
    ("час", 1),
    ("два", 2),
    ("три", 3),
    ("четыре", 4),
    ("пять", 5),
    ("шесть", 6),
    ("семь", 7),
    ("восемь", 8),
    ("девять", 9),
    ("десять", 10),
    ("одиннадцать", 11),
    ("двенадцать", 12),
];

/// Parse a scheduling slot out of free-form text.
///
/// Returns `None` when no time is recognized, and also when a numeric time
/// is present but out of range (H outside 0-23 or MM outside 0-59); an
/// out-of-range value invalidates the whole parse even if a day matched.
pub fn parse(text: &str) -> Option<TimeSlot> {
    let lower = text.to_lowercase();
    let day = detect_day(&lower);

    match numeric_time(&lower) {
        NumericMatch::Valid { hour, minute } => {
            return Some(TimeSlot {
                day,
                time: format!("{hour:02}:{minute:02}"),
            });
        }
        NumericMatch::OutOfRange => return None,
        NumericMatch::Absent => {}
    }

    if let Some(hour) = word_time(&lower) {
        return Some(TimeSlot {
            day,
            time: format!("{hour:02}:00"),
        });
    }

    None
}

fn detect_day(lower: &str) -> Option<Day> {
    if TODAY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Some(Day::Today)
    } else if TOMORROW_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Some(Day::Tomorrow)
    } else {
        None
    }
}

enum NumericMatch {
    Valid { hour: u32, minute: u32 },
    OutOfRange,
    Absent,
}

fn numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // H or H:MM / H.MM / "H MM"; word boundaries keep "100" from
        // matching as "10"+"0".
        Regex::new(r"\b(\d{1,2})(?:[:. ](\d{2}))?\b").unwrap()
    })
}

fn numeric_time(lower: &str) -> NumericMatch {
    let Some(caps) = numeric_regex().captures(lower) else {
        return NumericMatch::Absent;
    };

    // Captured groups are guaranteed numeric by the pattern.
    let hour: u32 = match caps[1].parse() {
        Ok(h) => h,
        Err(_) => return NumericMatch::Absent,
    };
    let minute: u32 = match caps.get(2) {
        Some(m) => match m.as_str().parse() {
            Ok(m) => m,
            Err(_) => return NumericMatch::Absent,
        },
        None => 0,
    };

    if hour > 23 || minute > 59 {
        return NumericMatch::OutOfRange;
    }

    NumericMatch::Valid { hour, minute }
}

/// Word-number time extraction: number words and "полдень"/"полночь",
/// optionally followed by a period-of-day qualifier.
fn word_time(lower: &str) -> Option<u32> {
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    for (i, token) in tokens.iter().enumerate() {
        if *token == "полдень" {
            return Some(12);
        }
        if *token == "полночь" {
            return Some(0);
        }

        let Some(&(_, base)) = WORD_HOURS.iter().find(|(word, _)| word == token) else {
            continue;
        };

        let qualifier = tokens.get(i + 1).copied();
        return Some(apply_qualifier(base, qualifier));
    }

    None
}

/// Promote a 12-hour base to 24-hour form using a period-of-day qualifier.
///
/// "дня"/"вечера" shift 1-11 to 13-23; "ночи" maps 12 to 0; "утра" and
/// no qualifier leave the base unchanged.
fn apply_qualifier(base: u32, qualifier: Option<&str>) -> u32 {
    match qualifier {
        Some("дня") | Some("вечера") if (1..=11).contains(&base) => base + 12,
        Some("ночи") if base == 12 => 0,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_hour_only() {
        let slot = parse("давайте в 15").unwrap();
        assert_eq!(slot.time, "15:00");
        assert_eq!(slot.day, None);
    }

    #[test]
    fn numeric_colon_dot_and_space_forms() {
        assert_eq!(parse("в 9:30").unwrap().time, "09:30");
        assert_eq!(parse("в 9.30").unwrap().time, "09:30");
        assert_eq!(parse("в 9 30").unwrap().time, "09:30");
    }

    #[test]
    fn day_keywords() {
        let slot = parse("завтра в 12:00").unwrap();
        assert_eq!(slot.day, Some(Day::Tomorrow));
        assert_eq!(slot.time, "12:00");

        let slot = parse("сегодня в 16").unwrap();
        assert_eq!(slot.day, Some(Day::Today));
        assert_eq!(slot.time, "16:00");
    }

    #[test]
    fn all_valid_hours_and_minutes_parse() {
        for h in 0..=23u32 {
            for m in [0u32, 5, 30, 59] {
                let text = format!("созвон в {h}:{m:02}");
                let slot = parse(&text).unwrap();
                assert_eq!(slot.time, format!("{h:02}:{m:02}"), "input: {text}");
            }
        }
    }

    #[test]
    fn out_of_range_hour_kills_whole_parse() {
        // Even with a valid day keyword present.
        assert!(parse("завтра в 25").is_none());
        assert!(parse("в 99:00").is_none());
    }

    #[test]
    fn out_of_range_minutes_kill_whole_parse() {
        assert!(parse("сегодня в 12:75").is_none());
    }

    #[test]
    fn bare_long_number_does_not_parse() {
        assert!(parse("нас 100 человек").is_none());
    }

    #[test]
    fn word_hours_with_evening_qualifier_promote() {
        assert_eq!(parse("в два дня").unwrap().time, "14:00");
        assert_eq!(parse("в семь вечера").unwrap().time, "19:00");
        assert_eq!(parse("в одиннадцать вечера").unwrap().time, "23:00");
    }

    #[test]
    fn word_hours_morning_is_identity() {
        assert_eq!(parse("в девять утра").unwrap().time, "09:00");
        assert_eq!(parse("в десять").unwrap().time, "10:00");
    }

    #[test]
    fn noon_and_midnight() {
        assert_eq!(parse("в полдень").unwrap().time, "12:00");
        assert_eq!(parse("в полночь").unwrap().time, "00:00");
        assert_eq!(parse("в двенадцать ночи").unwrap().time, "00:00");
    }

    #[test]
    fn twelve_day_stays_twelve() {
        // Qualifier promotion covers 1-11 only.
        assert_eq!(parse("в двенадцать дня").unwrap().time, "12:00");
    }

    #[test]
    fn no_time_returns_none() {
        assert!(parse("расскажите подробнее").is_none());
        assert!(parse("").is_none());
        // Bare day without a time is not a slot.
        assert!(parse("завтра").is_none());
    }
}

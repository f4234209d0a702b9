//! Weekly schedule transcription library.
//! Turns a pasted Japanese weekly calendar (one day header followed by its entries) into
//! dated records, and lays those records out on a fixed 7-day spreadsheet template.
//! The parsing and layout modules are pure; I/O lives behind `storage` and in the binary.

pub mod core {
    use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
    use serde::{Deserialize, Serialize};

    /* ------------------------------ Records ------------------------------ */

    /// One appointment line resolved against the day header above it.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ScheduleRecord {
        pub calendar_date: NaiveDate,
        /// Day header exactly as written (e.g. `23(月)`). Not used for layout.
        pub label_text: String,
        pub time_of_day: Option<NaiveTime>,
        #[serde(default)]
        pub location: String,
        #[serde(default)]
        pub activity: String,
        /// Time present and at least one of location/activity non-empty.
        pub is_complete: bool,
    }

    impl ScheduleRecord {
        pub fn timed(
            calendar_date: NaiveDate,
            label_text: impl Into<String>,
            time: NaiveTime,
            location: impl Into<String>,
            activity: impl Into<String>,
        ) -> Self {
            let location = location.into();
            let activity = activity.into();
            let is_complete = !location.is_empty() || !activity.is_empty();
            Self {
                calendar_date,
                label_text: label_text.into(),
                time_of_day: Some(time),
                location,
                activity,
                is_complete,
            }
        }

        /// Activity with neither time nor place, e.g. `（サンプル発送）`.
        pub fn untimed_activity(
            calendar_date: NaiveDate,
            label_text: impl Into<String>,
            activity: impl Into<String>,
        ) -> Self {
            Self {
                calendar_date,
                label_text: label_text.into(),
                time_of_day: None,
                location: String::new(),
                activity: activity.into(),
                is_complete: false,
            }
        }
    }

    /// Scan state threaded through a single parse pass.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ParseContext {
        pub year: i32,
        pub month: u32,
        /// Most recent day header, once one has been seen.
        pub current_date: Option<NaiveDate>,
        pub current_label: Option<String>,
    }

    impl ParseContext {
        pub fn new(year: i32, month: u32) -> Self {
            Self {
                year,
                month,
                current_date: None,
                current_label: None,
            }
        }
    }

    /* ----------------------------- Placements ----------------------------- */

    /// Template columns written by the layout (1-indexed, A..D).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub enum Column {
        DateLabel = 1,
        Time = 2,
        Location = 3,
        Activity = 4,
    }

    impl Column {
        pub fn index(self) -> u32 {
            self as u32
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub enum CellValue {
        Text(String),
        Time(NaiveTime),
        /// Explicitly cleared cell.
        Blank,
    }

    impl CellValue {
        /// Text cell, or `Blank` when the text is empty.
        pub fn text(value: impl Into<String>) -> Self {
            let value = value.into();
            if value.is_empty() {
                Self::Blank
            } else {
                Self::Text(value)
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PlacementInstruction {
        /// 1-indexed spreadsheet row.
        pub row: u32,
        pub column: Column,
        pub value: CellValue,
    }

    /* ---------------------------- Weekday glyphs ---------------------------- */

    /// Day names used on output, Monday first.
    pub const WEEKDAY_NAMES: [char; 7] = ['月', '火', '水', '木', '金', '土', '日'];

    /// Glyphs accepted in day headers and date ranges, Sunday first.
    pub const INPUT_WEEKDAY_GLYPHS: [char; 7] = ['日', '月', '火', '水', '木', '金', '土'];

    pub fn weekday_name(weekday: Weekday) -> char {
        WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
    }

    pub fn weekday_name_of(date: NaiveDate) -> char {
        weekday_name(date.weekday())
    }

    /* ---------------------------- Errors (domain) ---------------------------- */

    #[derive(Debug, thiserror::Error)]
    pub enum ScheduleError {
        #[error("day header {line:?} names day {day}, which does not exist in {year}-{month:02}")]
        MalformedDate {
            line: String,
            year: i32,
            month: u32,
            day: u32,
        },
        #[error("invalid template: {0}")]
        InvalidTemplate(String),
    }

}

pub mod config {
    //! Vocabulary the parser recognizes. Defaults cover the Japanese business calendar;
    //! a JSON file can replace any field (missing fields keep their defaults).

    use crate::core::INPUT_WEEKDAY_GLYPHS;
    use anyhow::{Context, Result};
    use serde::{Deserialize, Serialize};
    use std::{fs, path::Path};

    /// An opening/closing bracket glyph pair.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BracketFamily {
        pub open: char,
        pub close: char,
    }

    impl BracketFamily {
        pub const FULL_WIDTH: Self = Self {
            open: '（',
            close: '）',
        };
        pub const ASCII: Self = Self {
            open: '(',
            close: ')',
        };
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ParserSettings {
        /// Bracket families accepted around activities.
        pub bracket_families: Vec<BracketFamily>,
        /// A lone first token containing one of these is an activity, not a place.
        pub activity_keywords: Vec<String>,
        /// Remainders kept whole as a location (e.g. "company car, heading home").
        pub fixed_locations: Vec<String>,
        /// Glyphs accepted between the parentheses of `23(月)` and of date ranges.
        pub input_weekday_glyphs: Vec<char>,
    }

    impl Default for ParserSettings {
        fn default() -> Self {
            Self {
                bracket_families: vec![BracketFamily::FULL_WIDTH, BracketFamily::ASCII],
                activity_keywords: ["打合せ", "会議", "見学", "参加", "食事", "手配", "対応"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                fixed_locations: vec!["社用車帰宅".to_string()],
                input_weekday_glyphs: INPUT_WEEKDAY_GLYPHS.to_vec(),
            }
        }
    }

    impl ParserSettings {
        /// Only `(` `)` count as brackets.
        pub fn ascii_only() -> Self {
            Self {
                bracket_families: vec![BracketFamily::ASCII],
                ..Self::default()
            }
        }

        pub fn from_json_str(text: &str) -> Result<Self> {
            serde_json::from_str(text).context("decoding parser settings")
        }

        pub fn from_json_file(path: &Path) -> Result<Self> {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
            Self::from_json_str(&text).with_context(|| format!("parsing {:?}", path))
        }

        pub fn is_open(&self, c: char) -> bool {
            self.bracket_families.iter().any(|f| f.open == c)
        }

        pub fn is_close(&self, c: char) -> bool {
            self.bracket_families.iter().any(|f| f.close == c)
        }

        /// True when one family has both its glyphs somewhere in `text`.
        pub fn has_bracket_pair(&self, text: &str) -> bool {
            self.bracket_families
                .iter()
                .any(|f| text.contains(f.open) && text.contains(f.close))
        }

        /// Remove the recognized bracket glyphs from `text`.
        pub fn strip_brackets(&self, text: &str) -> String {
            text.chars()
                .filter(|c| !self.is_open(*c) && !self.is_close(*c))
                .collect()
        }

        pub fn is_activity_keyword(&self, text: &str) -> bool {
            self.activity_keywords
                .iter()
                .any(|k| !k.is_empty() && text.contains(k.as_str()))
        }

        pub fn is_fixed_location(&self, text: &str) -> bool {
            self.fixed_locations.iter().any(|p| p == text)
        }

        pub fn is_weekday_glyph(&self, c: char) -> bool {
            self.input_weekday_glyphs.contains(&c)
        }
    }

}

pub mod classify {
    //! Line shapes, recognized with `nom`.
    //!
    //! Precedence: day header, then bracket-only activity, then timed entry.
    //! Anything else is `Unrecognized` and is skipped by the caller.

    use crate::config::ParserSettings;
    use chrono::NaiveTime;
    use nom::{
        IResult,
        bytes::complete::{take_while_m_n, take_while1},
        character::complete::{char, satisfy},
        combinator::{all_consuming, map_opt, rest, verify},
        sequence::{delimited, pair, preceded, separated_pair},
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LineKind {
        /// `23(月)`
        DateHeader { day: u32, weekday: char },
        /// `（サンプル発送）`; holds the trimmed interior.
        BracketOnly(String),
        /// `08:50 川口本部`; holds the trimmed text after the time.
        Timed { time: NaiveTime, remainder: String },
        Unrecognized,
    }

    /// Classify one trimmed, non-empty line.
    pub fn classify_line(line: &str, settings: &ParserSettings) -> LineKind {
        if let Ok((_, (day, weekday))) = day_header(line, settings) {
            return LineKind::DateHeader { day, weekday };
        }
        if let Some(inner) = bracket_only(line, settings) {
            return LineKind::BracketOnly(inner.to_string());
        }
        if let Ok((_, (time, remainder))) = timed_entry(line) {
            return LineKind::Timed {
                time,
                remainder: remainder.trim().to_string(),
            };
        }
        LineKind::Unrecognized
    }

    pub fn is_date_header(line: &str, settings: &ParserSettings) -> bool {
        day_header(line, settings).is_ok()
    }

    pub(crate) type PResult<'a, T> = IResult<&'a str, T>;

    /* ----------------------------- Primitives ----------------------------- */

    /// ASCII `0`-`9` or full-width `０`-`９`.
    fn digit_value(c: char) -> Option<u32> {
        match c {
            '0'..='9' => c.to_digit(10),
            '０'..='９' => Some(c as u32 - '０' as u32),
            _ => None,
        }
    }

    /// Between `min` and `max` digits, ASCII or full-width.
    pub(crate) fn number(min: usize, max: usize) -> impl Fn(&str) -> PResult<'_, u32> {
        move |i: &str| {
            map_opt(
                take_while_m_n(min, max, |c: char| digit_value(c).is_some()),
                |digits: &str| {
                    digits
                        .chars()
                        .try_fold(0u32, |acc, c| Some(acc * 10 + digit_value(c)?))
                },
            )(i)
        }
    }

    /// `(月)`, with the glyph drawn from `settings`.
    pub(crate) fn weekday_suffix<'s>(
        settings: &'s ParserSettings,
    ) -> impl Fn(&str) -> PResult<'_, char> + 's {
        move |i: &str| {
            delimited(
                char('('),
                satisfy(|c| settings.is_weekday_glyph(c)),
                char(')'),
            )(i)
        }
    }

    /// `2025年6月`, `2025年06月`
    pub(crate) fn year_month(i: &str) -> PResult<'_, (i32, u32)> {
        let (i, year) = number(4, 4)(i)?;
        let (i, _) = char('年')(i)?;
        let (i, month) = number(1, 2)(i)?;
        let (i, _) = char('月')(i)?;
        Ok((i, (year as i32, month)))
    }

    /// First match of `parser` at any char boundary of `text`.
    pub(crate) fn find_first<'a, O>(
        text: &'a str,
        parser: impl Fn(&'a str) -> PResult<'a, O>,
    ) -> Option<O> {
        text.char_indices()
            .find_map(|(idx, _)| parser(&text[idx..]).ok().map(|(_, out)| out))
    }

    /* ------------------------------- Shapes ------------------------------- */

    fn day_header<'a>(i: &'a str, settings: &ParserSettings) -> PResult<'a, (u32, char)> {
        all_consuming(pair(number(1, 2), weekday_suffix(settings)))(i)
    }

    fn clock(i: &str) -> PResult<'_, NaiveTime> {
        map_opt(
            separated_pair(number(1, 2), char(':'), number(2, 2)),
            |(h, m)| NaiveTime::from_hms_opt(h, m, 0),
        )(i)
    }

    fn timed_entry(i: &str) -> PResult<'_, (NaiveTime, &str)> {
        all_consuming(pair(
            clock,
            preceded(
                take_while1(|c: char| c.is_whitespace()),
                verify(rest, |s: &str| !s.is_empty()),
            ),
        ))(i)
    }

    /// Interior of a line wrapped in brackets. Opening and closing glyphs may come from
    /// different recognized families.
    fn bracket_only<'a>(line: &'a str, settings: &ParserSettings) -> Option<&'a str> {
        let mut chars = line.chars();
        let open = chars.next()?;
        let close = chars.next_back()?;
        if !settings.is_open(open) || !settings.is_close(close) {
            return None;
        }
        let inner = line[open.len_utf8()..line.len() - close.len_utf8()].trim();
        (!inner.is_empty()).then_some(inner)
    }

}

pub mod entry {
    //! Turns a classified line into a date change or a record.

    use crate::classify::LineKind;
    use crate::config::ParserSettings;
    use crate::core::{ParseContext, ScheduleError, ScheduleRecord};
    use chrono::NaiveDate;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum EntryOutcome {
        /// A day header; subsequent entries belong to `date`.
        SetDate { date: NaiveDate, label: String },
        Record(ScheduleRecord),
        Skip,
    }

    /// Build the outcome for one line. Does not touch `ctx`; the caller applies `SetDate`.
    pub fn build_entry(
        line: &str,
        kind: LineKind,
        ctx: &ParseContext,
        settings: &ParserSettings,
    ) -> Result<EntryOutcome, ScheduleError> {
        match kind {
            LineKind::DateHeader { day, .. } => {
                let date = NaiveDate::from_ymd_opt(ctx.year, ctx.month, day).ok_or_else(|| {
                    ScheduleError::MalformedDate {
                        line: line.to_string(),
                        year: ctx.year,
                        month: ctx.month,
                        day,
                    }
                })?;
                Ok(EntryOutcome::SetDate {
                    date,
                    label: line.to_string(),
                })
            }
            LineKind::BracketOnly(activity) => Ok(match anchor(ctx) {
                Some((date, label)) => {
                    EntryOutcome::Record(ScheduleRecord::untimed_activity(date, label, activity))
                }
                None => EntryOutcome::Skip,
            }),
            LineKind::Timed { time, remainder } => Ok(match anchor(ctx) {
                Some((date, label)) => {
                    let (location, activity) = split_remainder(&remainder, settings);
                    EntryOutcome::Record(ScheduleRecord::timed(
                        date, label, time, location, activity,
                    ))
                }
                None => EntryOutcome::Skip,
            }),
            LineKind::Unrecognized => Ok(EntryOutcome::Skip),
        }
    }

    fn anchor(ctx: &ParseContext) -> Option<(NaiveDate, &str)> {
        let date = ctx.current_date?;
        Some((date, ctx.current_label.as_deref().unwrap_or_default()))
    }

    /// Split the text after a time into `(location, activity)`.
    pub fn split_remainder(remainder: &str, settings: &ParserSettings) -> (String, String) {
        let remainder = remainder.trim();
        let (mut location, mut activity) = if settings.has_bracket_pair(remainder) {
            (
                String::new(),
                settings.strip_brackets(remainder).trim().to_string(),
            )
        } else if settings.is_fixed_location(remainder) {
            (remainder.to_string(), String::new())
        } else {
            let mut tokens = remainder.split_whitespace();
            let location = tokens.next().unwrap_or_default().to_string();
            let activity = tokens.collect::<Vec<_>>().join(" ");
            (location, activity)
        };

        // "打合せ" alone is something done, not somewhere to go.
        if activity.is_empty() && !location.is_empty() && settings.is_activity_keyword(&location)
        {
            activity = std::mem::take(&mut location);
        }
        (location, activity)
    }

}

pub mod parser {
    //! Line-by-line scan of a pasted weekly schedule.
    //!
    //! - The first line may carry `YYYY年M月`; otherwise `today` supplies year and month.
    //! - Lines before the first day header (title, name fields) are ignored.
    //! - Records come back in input order; the layout does the sorting.

    use crate::classify::{classify_line, find_first, is_date_header, year_month};
    use crate::config::ParserSettings;
    use crate::core::{ParseContext, ScheduleError, ScheduleRecord};
    use crate::entry::{EntryOutcome, build_entry};
    use chrono::{Datelike, Local, NaiveDate};

    /// Parse with the default vocabulary, defaulting year/month to the local date.
    pub fn parse_schedule(text: &str) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        parse_schedule_with(text, &ParserSettings::default(), Local::now().date_naive())
    }

    pub fn parse_schedule_with(
        text: &str,
        settings: &ParserSettings,
        today: NaiveDate,
    ) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Ok(Vec::new());
        };

        let (year, month) =
            header_year_month(first).unwrap_or_else(|| (today.year(), today.month()));
        let Some(start) = lines.iter().position(|line| is_date_header(line, settings)) else {
            log::debug!("no day header found; nothing to parse");
            return Ok(Vec::new());
        };

        let mut ctx = ParseContext::new(year, month);
        let mut records = Vec::new();
        for line in &lines[start..] {
            let kind = classify_line(line, settings);
            match build_entry(line, kind, &ctx, settings)? {
                EntryOutcome::SetDate { date, label } => {
                    ctx.current_date = Some(date);
                    ctx.current_label = Some(label);
                }
                EntryOutcome::Record(record) => records.push(record),
                EntryOutcome::Skip => log::debug!("skipping line {:?}", line),
            }
        }
        Ok(records)
    }

    /// `(year, month)` from a `YYYY年M月` pattern anywhere in `line`.
    pub fn header_year_month(line: &str) -> Option<(i32, u32)> {
        find_first(line, year_month)
    }


}

pub mod filename {
    //! Output file name from the `YYYY年MM月DD日(W) ～ YYYY年MM月DD日(W)` range header.
    //! Independent of the record parse, so a broken body still gets a sensible name.

    use crate::classify::{PResult, find_first, number, weekday_suffix, year_month};
    use crate::config::ParserSettings;
    use chrono::{Local, NaiveDate};
    use nom::{bytes::complete::take_while, character::complete::char, sequence::tuple};

    pub const SPREADSHEET_EXTENSION: &str = "xlsx";

    /// A date as written in the range header; not validated against the calendar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HeaderDate {
        pub year: i32,
        pub month: u32,
        pub day: u32,
    }

    impl HeaderDate {
        /// `YYYYMMDD`
        pub fn compact(&self) -> String {
            format!("{:04}{:02}{:02}", self.year, self.month, self.day)
        }
    }

    pub fn derive_filename(text: &str) -> String {
        derive_filename_on(text, Local::now().date_naive())
    }

    pub fn derive_filename_on(text: &str, today: NaiveDate) -> String {
        derive_filename_with(text, &ParserSettings::default(), today)
    }

    pub fn derive_filename_with(
        text: &str,
        settings: &ParserSettings,
        today: NaiveDate,
    ) -> String {
        match find_date_range_with(text, settings) {
            Some((start, end)) => format!(
                "{}to{}.{}",
                start.compact(),
                end.compact(),
                SPREADSHEET_EXTENSION
            ),
            None => {
                log::debug!("no date range header; using fallback file name");
                format!(
                    "weekly_schedule_{}.{}",
                    today.format("%Y%m%d"),
                    SPREADSHEET_EXTENSION
                )
            }
        }
    }

    pub fn find_date_range(text: &str) -> Option<(HeaderDate, HeaderDate)> {
        find_date_range_with(text, &ParserSettings::default())
    }

    pub fn find_date_range_with(
        text: &str,
        settings: &ParserSettings,
    ) -> Option<(HeaderDate, HeaderDate)> {
        find_first(text, |i| date_range(i, settings))
    }

    fn header_date<'a>(i: &'a str, settings: &ParserSettings) -> PResult<'a, HeaderDate> {
        let (i, (year, month)) = year_month(i)?;
        let (i, day) = number(1, 2)(i)?;
        let (i, _) = char('日')(i)?;
        let (i, _) = weekday_suffix(settings)(i)?;
        Ok((i, HeaderDate { year, month, day }))
    }

    fn spaces(i: &str) -> PResult<'_, &str> {
        take_while(|c: char| c.is_whitespace())(i)
    }

    fn date_range<'a>(
        i: &'a str,
        settings: &ParserSettings,
    ) -> PResult<'a, (HeaderDate, HeaderDate)> {
        let (i, start) = header_date(i, settings)?;
        let (i, _) = tuple((spaces, char('～'), spaces))(i)?;
        let (i, end) = header_date(i, settings)?;
        Ok((i, (start, end)))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn today() -> NaiveDate {
            NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
        }

        #[test]
        fn range_header_names_the_file() {
            let text = "2025年06月23日(月) ～ 2025年06月29日(日)\n23(月)";
            assert_eq!(derive_filename_on(text, today()), "20250623to20250629.xlsx");
        }

        #[test]
        fn single_digit_parts_are_zero_padded() {
            let text = "週間予定\n期間: 2025年6月30日(月)～2025年7月6日(日)";
            assert_eq!(derive_filename_on(text, today()), "20250630to20250706.xlsx");
        }

        #[test]
        fn missing_range_falls_back_to_today() {
            assert_eq!(derive_filename_on("", today()), "weekly_schedule_20250704.xlsx");
            assert_eq!(
                derive_filename_on("2025年06月23日(月)\n23(月)", today()),
                "weekly_schedule_20250704.xlsx"
            );
        }

        #[test]
        fn range_header_follows_settings() {
            let text = "２０２５年０６月２３日(M) ～ ２０２５年０６月２９日(S)";
            assert_eq!(
                derive_filename_on(text, today()),
                "weekly_schedule_20250704.xlsx"
            );
            let settings =
                ParserSettings::from_json_str(r#"{ "input_weekday_glyphs": ["M", "S"] }"#).unwrap();
            assert_eq!(
                derive_filename_with(text, &settings, today()),
                "20250623to20250629.xlsx"
            );
        }

        #[test]
        fn range_survives_a_broken_body() {
            let text = "2025年02月24日(月) ～ 2025年03月02日(日)\n31(月)\n??";
            assert_eq!(
                find_date_range(text),
                Some((
                    HeaderDate {
                        year: 2025,
                        month: 2,
                        day: 24
                    },
                    HeaderDate {
                        year: 2025,
                        month: 3,
                        day: 2
                    }
                ))
            );
        }
    }
}

pub mod layout {
    //! Placement of records on the weekly template.
    //!
    //! Seven consecutive days starting at the earliest record's date, each owning a block of
    //! six rows from row 7 down. Column A of a block holds `(曜)` then `YYYY/M/D`; columns
    //! B..D hold up to six entries, complete entries first, then by time.

    use crate::config::ParserSettings;
    use crate::core::{CellValue, Column, PlacementInstruction, ScheduleRecord, weekday_name_of};
    use chrono::{Datelike, Duration, NaiveDate};
    use std::collections::BTreeMap;

    pub const FIRST_ROW: u32 = 7;
    pub const ROWS_PER_DAY: u32 = 6;
    pub const DAYS_PER_WEEK: u32 = 7;

    /// The seven dates starting at the earliest record, or `None` without records.
    pub fn week_window(records: &[ScheduleRecord]) -> Option<Vec<NaiveDate>> {
        let start = records.iter().map(|r| r.calendar_date).min()?;
        Some(
            (0..DAYS_PER_WEEK)
                .map(|d| start + Duration::days(i64::from(d)))
                .collect(),
        )
    }

    /// Complete before incomplete; ascending time within a tier, untimed last. Stable.
    pub fn sort_day(records: &mut [&ScheduleRecord]) {
        records.sort_by_key(|r| (!r.is_complete, r.time_of_day.is_none(), r.time_of_day));
    }

    pub fn block_start_row(day_index: u32) -> u32 {
        FIRST_ROW + day_index * ROWS_PER_DAY
    }

    pub fn layout(records: &[ScheduleRecord]) -> Vec<PlacementInstruction> {
        layout_with(records, &ParserSettings::default())
    }

    /// Location and activity text lose the bracket glyphs `settings` recognizes.
    pub fn layout_with(
        records: &[ScheduleRecord],
        settings: &ParserSettings,
    ) -> Vec<PlacementInstruction> {
        let Some(days) = week_window(records) else {
            return Vec::new();
        };

        let mut buckets: BTreeMap<NaiveDate, Vec<&ScheduleRecord>> = BTreeMap::new();
        for record in records {
            buckets.entry(record.calendar_date).or_default().push(record);
        }

        let mut out = Vec::new();
        for (day_index, date) in (0u32..).zip(days.iter()) {
            let start = block_start_row(day_index);
            push_date_label(&mut out, start, *date);

            let mut entries = buckets.remove(date).unwrap_or_default();
            sort_day(&mut entries);
            if entries.len() > ROWS_PER_DAY as usize {
                log::debug!(
                    "{}: {} entries exceed the {}-row block; dropping {}",
                    date,
                    entries.len(),
                    ROWS_PER_DAY,
                    entries.len() - ROWS_PER_DAY as usize
                );
            }
            for (row, record) in (start..start + ROWS_PER_DAY).zip(entries) {
                push_entry(&mut out, row, record, settings);
            }
        }

        for (date, leftover) in buckets {
            log::debug!(
                "{}: outside the {}-day window; dropping {} record(s)",
                date,
                DAYS_PER_WEEK,
                leftover.len()
            );
        }
        out
    }

    fn push_date_label(out: &mut Vec<PlacementInstruction>, start: u32, date: NaiveDate) {
        for offset in 0..ROWS_PER_DAY {
            let value = match offset {
                0 => CellValue::Text(format!("({})", weekday_name_of(date))),
                1 => CellValue::Text(format!("{}/{}/{}", date.year(), date.month(), date.day())),
                _ => CellValue::Blank,
            };
            out.push(PlacementInstruction {
                row: start + offset,
                column: Column::DateLabel,
                value,
            });
        }
    }

    fn push_entry(
        out: &mut Vec<PlacementInstruction>,
        row: u32,
        record: &ScheduleRecord,
        settings: &ParserSettings,
    ) {
        let time = record.time_of_day.map_or(CellValue::Blank, CellValue::Time);
        out.push(PlacementInstruction {
            row,
            column: Column::Time,
            value: time,
        });
        out.push(PlacementInstruction {
            row,
            column: Column::Location,
            value: CellValue::text(settings.strip_brackets(&record.location)),
        });
        out.push(PlacementInstruction {
            row,
            column: Column::Activity,
            value: CellValue::text(settings.strip_brackets(&record.activity)),
        });
    }

}

pub mod summary {
    //! Read-model for checking a parse before rendering: counts plus a preview table.

    use crate::config::ParserSettings;
    use crate::core::ScheduleRecord;
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    pub struct ScheduleSummary {
        pub total: usize,
        pub complete: usize,
        pub partial: usize,
    }

    impl ScheduleSummary {
        pub fn of(records: &[ScheduleRecord]) -> Self {
            let complete = records.iter().filter(|r| r.is_complete).count();
            Self {
                total: records.len(),
                complete,
                partial: records.len() - complete,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum EntryPriority {
        Complete,
        Partial,
    }

    impl EntryPriority {
        pub fn label(self) -> &'static str {
            match self {
                Self::Complete => "完全",
                Self::Partial => "部分",
            }
        }
    }

    /// One preview line; missing values show as `-`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct PreviewRow {
        /// `06/23 (Mon)`
        pub date: String,
        pub priority: EntryPriority,
        pub time: String,
        pub location: String,
        pub activity: String,
    }

    /// Location and activity lose the bracket glyphs `settings` recognizes, as in the layout.
    pub fn preview_rows(
        records: &[ScheduleRecord],
        settings: &ParserSettings,
    ) -> Vec<PreviewRow> {
        records
            .iter()
            .map(|r| PreviewRow {
                date: r.calendar_date.format("%m/%d (%a)").to_string(),
                priority: if r.is_complete {
                    EntryPriority::Complete
                } else {
                    EntryPriority::Partial
                },
                time: r
                    .time_of_day
                    .map_or_else(|| "-".to_string(), |t| t.format("%H:%M").to_string()),
                location: dash_if_empty(settings.strip_brackets(&r.location)),
                activity: dash_if_empty(settings.strip_brackets(&r.activity)),
            })
            .collect()
    }

    fn dash_if_empty(s: String) -> String {
        if s.is_empty() { "-".to_string() } else { s }
    }

}

pub mod storage {
    use crate::core::PlacementInstruction;
    use anyhow::Result;

    /// Writes placements into a spreadsheet template and returns the new file's bytes.
    pub trait TemplateRenderer {
        /// An empty `placements` slice must return the template unchanged.
        fn render(&self, template: &[u8], placements: &[PlacementInstruction]) -> Result<Vec<u8>>;
    }
}

pub mod xlsx {
    //! `.xlsx` template renderer built on `zip` + `quick-xml`.
    //!
    //! Only the active worksheet's `<sheetData>` is rewritten; every other archive entry is
    //! copied raw. Touched cells keep their style index (`s`) so template formatting for
    //! the time column etc. still applies.

    use crate::core::{CellValue, PlacementInstruction, ScheduleError};
    use crate::storage::TemplateRenderer;
    use anyhow::{Context, Result, bail};
    use chrono::{NaiveTime, Timelike};
    use quick_xml::{
        Reader, Writer,
        events::{BytesEnd, BytesStart, BytesText, Event},
    };
    use std::collections::BTreeMap;
    use std::io::{Cursor, Read, Seek, Write};
    use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

    const WORKBOOK: &str = "xl/workbook.xml";
    const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";

    #[derive(Debug, Clone, Copy, Default)]
    pub struct XlsxTemplateRenderer;

    impl TemplateRenderer for XlsxTemplateRenderer {
        fn render(&self, template: &[u8], placements: &[PlacementInstruction]) -> Result<Vec<u8>> {
            if placements.is_empty() {
                return Ok(template.to_vec());
            }

            let mut archive = ZipArchive::new(Cursor::new(template))
                .context("reading template as an xlsx (zip) container")?;
            let sheet_path = active_sheet_path(&mut archive)?;
            log::debug!("rendering {} placements into {}", placements.len(), sheet_path);
            let sheet_xml = read_entry(&mut archive, &sheet_path)?;
            let rewritten = rewrite_sheet(&sheet_xml, placements)
                .with_context(|| format!("rewriting {}", sheet_path))?;

            let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
            for idx in 0..archive.len() {
                let entry = archive.by_index_raw(idx)?;
                if entry.name() == sheet_path {
                    let options =
                        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
                    writer.start_file(sheet_path.as_str(), options)?;
                    writer.write_all(rewritten.as_bytes())?;
                } else {
                    writer.raw_copy_file(entry)?;
                }
            }
            Ok(writer.finish()?.into_inner())
        }
    }

    /* --------------------------- Sheet resolution --------------------------- */

    fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
        let mut entry = archive
            .by_name(name)
            .with_context(|| format!("template has no {}", name))?;
        let mut out = String::new();
        entry
            .read_to_string(&mut out)
            .with_context(|| format!("reading {}", name))?;
        Ok(out)
    }

    /// Archive path of the worksheet Excel opens first (`activeTab`, else the first sheet).
    fn active_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
        let workbook = read_entry(archive, WORKBOOK)?;
        let (sheet_ids, active_tab) = workbook_sheets(&workbook)?;
        let rel_id = sheet_ids
            .get(active_tab)
            .or_else(|| sheet_ids.first())
            .ok_or_else(|| ScheduleError::InvalidTemplate("workbook lists no sheets".into()))?;

        let rels = read_entry(archive, WORKBOOK_RELS)?;
        let target = relationship_target(&rels, rel_id)?.ok_or_else(|| {
            ScheduleError::InvalidTemplate(format!("no relationship for sheet {}", rel_id))
        })?;
        Ok(match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{}", target),
        })
    }

    /// Relationship ids of `<sheet>` elements in order, plus the active tab index.
    fn workbook_sheets(xml: &str) -> Result<(Vec<String>, usize)> {
        let mut reader = Reader::from_str(xml);
        let mut ids = Vec::new();
        let mut active_tab = 0;
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"sheet" => {
                        for attr in e.attributes() {
                            let attr = attr?;
                            if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id"
                            {
                                ids.push(attr.unescape_value()?.into_owned());
                            }
                        }
                    }
                    b"workbookView" => {
                        if let Some(tab) = attribute(&e, b"activeTab")? {
                            active_tab = tab.parse().unwrap_or(0);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok((ids, active_tab))
    }

    fn relationship_target(xml: &str, id: &str) -> Result<Option<String>> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    if attribute(&e, b"Id")?.as_deref() == Some(id) {
                        return attribute(&e, b"Target");
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.as_ref() == key {
                return Ok(Some(attr.unescape_value()?.into_owned()));
            }
        }
        Ok(None)
    }

    /* ----------------------------- Sheet model ----------------------------- */

    struct CellXml {
        start: BytesStart<'static>,
        /// Events between `<c>` and `</c>`; empty for `<c/>`.
        body: Vec<Event<'static>>,
    }

    struct RowXml {
        start: BytesStart<'static>,
        cells: BTreeMap<u32, CellXml>,
    }

    /// Rewrite `<sheetData>` with `placements` applied; everything else passes through.
    pub fn rewrite_sheet(xml: &str, placements: &[PlacementInstruction]) -> Result<String> {
        let mut targets: BTreeMap<u32, BTreeMap<u32, &CellValue>> = BTreeMap::new();
        for p in placements {
            targets
                .entry(p.row)
                .or_default()
                .insert(p.column.index(), &p.value);
        }

        let mut reader = Reader::from_str(xml);
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        loop {
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"sheetData" => {
                    let rows = read_rows(&mut reader)?;
                    write_sheet_data(&mut writer, e.into_owned(), rows, &targets)?;
                }
                Event::Empty(e) if e.local_name().as_ref() == b"sheetData" => {
                    write_sheet_data(&mut writer, e.into_owned(), BTreeMap::new(), &targets)?;
                }
                Event::Eof => break,
                event => writer.write_event(event)?,
            }
        }
        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }

    fn read_rows(reader: &mut Reader<&[u8]>) -> Result<BTreeMap<u32, RowXml>> {
        let mut rows = BTreeMap::new();
        let mut next_row = 1;
        loop {
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"row" => {
                    let number = row_number(&e)?.unwrap_or(next_row);
                    let cells = read_cells(reader)?;
                    rows.insert(number, RowXml { start: e.into_owned(), cells });
                    next_row = number + 1;
                }
                Event::Empty(e) if e.local_name().as_ref() == b"row" => {
                    let number = row_number(&e)?.unwrap_or(next_row);
                    rows.insert(
                        number,
                        RowXml {
                            start: e.into_owned(),
                            cells: BTreeMap::new(),
                        },
                    );
                    next_row = number + 1;
                }
                Event::End(e) if e.local_name().as_ref() == b"sheetData" => return Ok(rows),
                Event::Eof => bail!("unterminated <sheetData>"),
                _ => {}
            }
        }
    }

    fn read_cells(reader: &mut Reader<&[u8]>) -> Result<BTreeMap<u32, CellXml>> {
        let mut cells = BTreeMap::new();
        let mut next_col = 1;
        loop {
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"c" => {
                    let col = cell_column(&e)?.unwrap_or(next_col);
                    let body = read_cell_body(reader)?;
                    cells.insert(col, CellXml { start: e.into_owned(), body });
                    next_col = col + 1;
                }
                Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                    let col = cell_column(&e)?.unwrap_or(next_col);
                    cells.insert(
                        col,
                        CellXml {
                            start: e.into_owned(),
                            body: Vec::new(),
                        },
                    );
                    next_col = col + 1;
                }
                Event::End(e) if e.local_name().as_ref() == b"row" => return Ok(cells),
                Event::Eof => bail!("unterminated <row>"),
                _ => {}
            }
        }
    }

    fn read_cell_body(reader: &mut Reader<&[u8]>) -> Result<Vec<Event<'static>>> {
        let mut body = Vec::new();
        let mut depth = 0usize;
        loop {
            let event = reader.read_event()?;
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(e) if depth == 0 && e.local_name().as_ref() == b"c" => return Ok(body),
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => bail!("unterminated <c>"),
                _ => {}
            }
            body.push(event.into_owned());
        }
    }

    fn row_number(e: &BytesStart<'_>) -> Result<Option<u32>> {
        Ok(attribute(e, b"r")?.and_then(|r| r.parse().ok()))
    }

    fn cell_column(e: &BytesStart<'_>) -> Result<Option<u32>> {
        Ok(attribute(e, b"r")?.and_then(|r| split_cell_ref(&r)).map(|(col, _)| col))
    }

    /* ------------------------------- Writing ------------------------------- */

    fn write_sheet_data<W: Write>(
        writer: &mut Writer<W>,
        start: BytesStart<'static>,
        mut rows: BTreeMap<u32, RowXml>,
        targets: &BTreeMap<u32, BTreeMap<u32, &CellValue>>,
    ) -> Result<()> {
        for (&row, values) in targets {
            let row_xml = rows.entry(row).or_insert_with(|| RowXml {
                start: BytesStart::new("row"),
                cells: BTreeMap::new(),
            });
            for (&col, value) in values {
                let style = match row_xml.cells.get(&col) {
                    Some(existing) => attribute(&existing.start, b"s")?,
                    None => None,
                };
                row_xml
                    .cells
                    .insert(col, build_cell(&cell_ref(col, row), style.as_deref(), value));
            }
        }

        writer.write_event(Event::Start(start))?;
        for (number, row) in rows {
            writer.write_event(Event::Start(row_start(&row.start, number)?))?;
            for (_, cell) in row.cells {
                if cell.body.is_empty() {
                    writer.write_event(Event::Empty(cell.start))?;
                } else {
                    writer.write_event(Event::Start(cell.start))?;
                    for event in cell.body {
                        writer.write_event(event)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new("c")))?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new("row")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
        Ok(())
    }

    /// `<row>` start with `r` set and the `spans` hint dropped (it may no longer hold).
    fn row_start(original: &BytesStart<'_>, number: u32) -> Result<BytesStart<'static>> {
        let mut start = BytesStart::new("row");
        start.push_attribute(("r", number.to_string().as_str()));
        for attr in original.attributes() {
            let attr = attr?;
            if !matches!(attr.key.as_ref(), b"r" | b"spans") {
                start.push_attribute(attr);
            }
        }
        Ok(start)
    }

    fn build_cell(reference: &str, style: Option<&str>, value: &CellValue) -> CellXml {
        let mut start = BytesStart::new("c");
        start.push_attribute(("r", reference));
        if let Some(style) = style {
            start.push_attribute(("s", style));
        }
        let body = match value {
            CellValue::Blank => Vec::new(),
            CellValue::Time(time) => vec![
                Event::Start(BytesStart::new("v")),
                Event::Text(BytesText::new(&day_fraction(*time).to_string()).into_owned()),
                Event::End(BytesEnd::new("v")),
            ],
            CellValue::Text(text) => {
                start.push_attribute(("t", "inlineStr"));
                let mut t = BytesStart::new("t");
                t.push_attribute(("xml:space", "preserve"));
                vec![
                    Event::Start(BytesStart::new("is")),
                    Event::Start(t),
                    Event::Text(BytesText::new(text).into_owned()),
                    Event::End(BytesEnd::new("t")),
                    Event::End(BytesEnd::new("is")),
                ]
            }
        };
        CellXml { start, body }
    }

    /// Excel stores a time of day as the elapsed fraction of a day.
    pub fn day_fraction(time: NaiveTime) -> f64 {
        f64::from(time.hour() * 60 + time.minute()) / 1440.0
    }

    /* ---------------------------- Cell references ---------------------------- */

    /// `(4, 7)` -> `D7`
    pub fn cell_ref(col: u32, row: u32) -> String {
        let mut letters = Vec::new();
        let mut n = col;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect::<String>() + &row.to_string()
    }

    /// `D7` -> `(4, 7)`
    pub fn split_cell_ref(reference: &str) -> Option<(u32, u32)> {
        let digits_at = reference.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = reference.split_at(digits_at);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let col = letters.chars().fold(0u32, |acc, c| {
            acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        });
        Some((col, digits.parse().ok()?))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::Column;

        const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

        const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><bookViews><workbookView activeTab="1"/></bookViews><sheets><sheet name="Cover" sheetId="1" r:id="rId1"/><sheet name="週間" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

        const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/></Relationships>"#;

        const COVER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#;

        const WEEK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cols><col min="1" max="4" width="14"/></cols><sheetData><row r="1" spans="1:4"><c r="A1" t="inlineStr"><is><t>週間行動予定</t></is></c></row><row r="7" spans="1:4"><c r="A7" s="2"/><c r="B7" s="3"><v>0.5</v></c><c r="E7"><v>42</v></c></row></sheetData><mergeCells count="1"><mergeCell ref="A1:D1"/></mergeCells></worksheet>"#;

        fn template() -> Vec<u8> {
            let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
            for (name, body) in [
                ("[Content_Types].xml", CONTENT_TYPES),
                (WORKBOOK, WORKBOOK_XML),
                (WORKBOOK_RELS, RELS_XML),
                ("xl/worksheets/sheet1.xml", COVER_XML),
                ("xl/worksheets/sheet2.xml", WEEK_XML),
            ] {
                zip.start_file(name, SimpleFileOptions::default()).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap().into_inner()
        }

        fn entry(bytes: &[u8], name: &str) -> String {
            let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
            read_entry(&mut archive, name).unwrap()
        }

        fn place(row: u32, column: Column, value: CellValue) -> PlacementInstruction {
            PlacementInstruction { row, column, value }
        }

        #[test]
        fn empty_placements_return_template_unchanged() {
            let bytes = template();
            let out = XlsxTemplateRenderer.render(&bytes, &[]).unwrap();
            assert_eq!(out, bytes);
        }

        #[test]
        fn active_tab_selects_the_sheet() {
            let bytes = template();
            let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
            assert_eq!(
                active_sheet_path(&mut archive).unwrap(),
                "xl/worksheets/sheet2.xml"
            );
        }

        #[test]
        fn render_writes_cells_and_keeps_styles() {
            let bytes = template();
            let placements = vec![
                place(7, Column::DateLabel, CellValue::Text("(月)".into())),
                place(
                    7,
                    Column::Time,
                    CellValue::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
                ),
                place(7, Column::Location, CellValue::Text("R&D棟".into())),
                place(9, Column::DateLabel, CellValue::Blank),
            ];
            let out = XlsxTemplateRenderer.render(&bytes, &placements).unwrap();
            let sheet = entry(&out, "xl/worksheets/sheet2.xml");

            assert!(sheet.contains(
                r#"<c r="A7" s="2" t="inlineStr"><is><t xml:space="preserve">(月)</t></is></c>"#
            ));
            assert!(sheet.contains(r#"<c r="B7" s="3"><v>0.5</v></c>"#));
            assert!(sheet.contains(r#"<t xml:space="preserve">R&amp;D棟</t>"#));
            assert!(sheet.contains(r#"<c r="E7"><v>42</v></c>"#));
            assert!(sheet.contains(r#"<row r="9"><c r="A9"/></row>"#));
            assert!(sheet.contains(r#"<row r="1"><c r="A1" t="inlineStr"><is><t>週間行動予定</t></is></c></row>"#));
            assert!(sheet.contains(r#"<mergeCell ref="A1:D1"/>"#));

            let a7 = sheet.find(r#"r="A7""#).unwrap();
            let c7 = sheet.find(r#"r="C7""#).unwrap();
            let e7 = sheet.find(r#"r="E7""#).unwrap();
            assert!(a7 < c7 && c7 < e7);
            let row7 = sheet.find(r#"<row r="7""#).unwrap();
            let row9 = sheet.find(r#"<row r="9""#).unwrap();
            assert!(row7 < row9);
        }

        #[test]
        fn other_entries_are_copied_verbatim() {
            let bytes = template();
            let placements = vec![place(7, Column::Activity, CellValue::Text("会議".into()))];
            let out = XlsxTemplateRenderer.render(&bytes, &placements).unwrap();
            assert_eq!(entry(&out, WORKBOOK), WORKBOOK_XML);
            assert_eq!(entry(&out, "xl/worksheets/sheet1.xml"), COVER_XML);
        }

        #[test]
        fn empty_sheet_data_is_filled() {
            let placements = vec![place(13, Column::DateLabel, CellValue::Text("(火)".into()))];
            let sheet = rewrite_sheet(COVER_XML, &placements).unwrap();
            assert!(sheet.contains(
                r#"<sheetData><row r="13"><c r="A13" t="inlineStr"><is><t xml:space="preserve">(火)</t></is></c></row></sheetData>"#
            ));
        }

        #[test]
        fn non_zip_template_is_an_error() {
            let placements = vec![place(7, Column::DateLabel, CellValue::Blank)];
            assert!(XlsxTemplateRenderer.render(b"not a workbook", &placements).is_err());
        }

        #[test]
        fn cell_references_round_trip() {
            assert_eq!(cell_ref(1, 7), "A7");
            assert_eq!(cell_ref(27, 3), "AA3");
            assert_eq!(split_cell_ref("D48"), Some((4, 48)));
            assert_eq!(split_cell_ref("AA3"), Some((27, 3)));
            assert_eq!(split_cell_ref("12"), None);
        }

        #[test]
        fn times_become_day_fractions() {
            assert_eq!(day_fraction(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), 0.5);
            assert_eq!(day_fraction(NaiveTime::from_hms_opt(6, 0, 0).unwrap()), 0.25);
        }
    }
}

pub use config::ParserSettings;
pub use filename::derive_filename;
pub use layout::layout;
pub use parser::{parse_schedule, parse_schedule_with};
pub use storage::TemplateRenderer;
pub use xlsx::XlsxTemplateRenderer;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use sched::core::ScheduleRecord;
use sched::filename::derive_filename_with;
use sched::layout::layout_with;
use sched::parser::parse_schedule_with;
use sched::summary::{ScheduleSummary, preview_rows};
use sched::{ParserSettings, TemplateRenderer, XlsxTemplateRenderer};

#[derive(Debug, Parser)]
#[command(
    name = "sched",
    about = "Convert pasted weekly schedules into the weekly spreadsheet template",
    version
)]
struct Cli {
    /// Enable verbose logging for debugging.
    #[arg(long, global = true)]
    verbose: bool,
    /// JSON file overriding the recognized brackets, keywords and fixed phrases.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse schedule text and print the records.
    Parse(ParseArgs),

    /// Print complete/partial counts and a preview table.
    Preview(TextArgs),

    /// Print the output file name derived from the date range header.
    Filename(TextArgs),

    /// Fill the spreadsheet template with the parsed week.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct TextArgs {
    /// Schedule text file, or `-` for stdin.
    input: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schedule text file, or `-` for stdin.
    input: PathBuf,
    /// Emit JSON instead of a debug representation.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Schedule text file, or `-` for stdin.
    input: PathBuf,
    /// Blank .xlsx template to fill.
    #[arg(long)]
    template: PathBuf,
    /// Exact output path.
    #[arg(long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,
    /// Directory for the output; the file name is derived from the schedule header.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = match &cli.config {
        Some(path) => ParserSettings::from_json_file(path)?,
        None => ParserSettings::default(),
    };
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Parse(args) => handle_parse(args, &settings, today),
        Commands::Preview(args) => handle_preview(args, &settings, today),
        Commands::Filename(args) => handle_filename(args, &settings, today),
        Commands::Render(args) => handle_render(args, &settings, today),
    }
}

fn handle_parse(args: ParseArgs, settings: &ParserSettings, today: NaiveDate) -> Result<()> {
    let ParseArgs { input, json } = args;
    let records = load_records(&input, settings, today)?.1;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{:#?}", records);
    }
    Ok(())
}

fn handle_preview(args: TextArgs, settings: &ParserSettings, today: NaiveDate) -> Result<()> {
    let records = load_records(&args.input, settings, today)?.1;
    if records.is_empty() {
        eprintln!("No schedule entries found in {:?}.", args.input);
        return Ok(());
    }

    let summary = ScheduleSummary::of(&records);
    println!(
        "{} entries parsed ({} complete, {} partial)",
        summary.total, summary.complete, summary.partial
    );
    for row in preview_rows(&records, settings) {
        println!(
            "{} {} {:<5} {} / {}",
            row.date,
            row.priority.label(),
            row.time,
            row.location,
            row.activity
        );
    }
    Ok(())
}

fn handle_filename(args: TextArgs, settings: &ParserSettings, today: NaiveDate) -> Result<()> {
    let text = read_text(&args.input)?;
    println!("{}", derive_filename_with(&text, settings, today));
    Ok(())
}

fn handle_render(args: RenderArgs, settings: &ParserSettings, today: NaiveDate) -> Result<()> {
    let RenderArgs {
        input,
        template,
        output,
        out_dir,
    } = args;

    let (text, records) = load_records(&input, settings, today)?;
    if records.is_empty() {
        anyhow::bail!("no schedule entries found in {:?}; parse the schedule first", input);
    }

    let template_bytes =
        fs::read(&template).with_context(|| format!("reading template {:?}", template))?;
    let placements = layout_with(&records, settings);
    log::debug!("{} placements for {} records", placements.len(), records.len());
    let rendered = XlsxTemplateRenderer
        .render(&template_bytes, &placements)
        .with_context(|| format!("rendering into {:?}", template))?;

    let derived_name = derive_filename_with(&text, settings, today);
    let target = resolve_output_path(output, out_dir, &derived_name);
    fs::write(&target, rendered).with_context(|| format!("writing {:?}", target))?;
    println!("Wrote {} entries to {:?}", records.len(), target);
    Ok(())
}

fn load_records(
    input: &Path,
    settings: &ParserSettings,
    today: NaiveDate,
) -> Result<(String, Vec<ScheduleRecord>)> {
    let text = read_text(input)?;
    let records = parse_schedule_with(&text, settings, today)
        .with_context(|| format!("parsing {:?}", input))?;
    log::info!("parsed {} entries from {:?}", records.len(), input);
    Ok((text, records))
}

fn read_text(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading schedule text from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("reading {:?}", input))
}

fn resolve_output_path(
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    derived_name: &str,
) -> PathBuf {
    match (output, out_dir) {
        (Some(path), _) => path,
        (None, Some(dir)) => dir.join(derived_name),
        (None, None) => PathBuf::from(derived_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched::core::CellValue;
    use std::fs;

    #[test]
    fn output_path_prefers_explicit_path() {
        let resolved = resolve_output_path(
            Some(PathBuf::from("out/week.xlsx")),
            Some(PathBuf::from("ignored")),
            "20250623to20250629.xlsx",
        );
        assert_eq!(resolved, PathBuf::from("out/week.xlsx"));
    }

    #[test]
    fn output_path_uses_derived_name() {
        assert_eq!(
            resolve_output_path(None, Some(PathBuf::from("exports")), "a.xlsx"),
            PathBuf::from("exports/a.xlsx")
        );
        assert_eq!(
            resolve_output_path(None, None, "a.xlsx"),
            PathBuf::from("a.xlsx")
        );
    }

    #[test]
    fn load_records_reads_schedule_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("week.txt");
        fs::write(&path, "2025年06月23日(月) ～ 2025年06月29日(日)\n23(月)\n08:50 川口本部\n")
            .expect("write schedule");

        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let settings = ParserSettings::default();
        let (text, records) = load_records(&path, &settings, today).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(
            derive_filename_with(&text, &settings, today),
            "20250623to20250629.xlsx"
        );
    }

    #[test]
    fn config_file_reaches_parse_and_layout() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = tmp.path().join("settings.json");
        fs::write(
            &config,
            r#"{ "bracket_families": [{ "open": "[", "close": "]" }], "input_weekday_glyphs": ["M"] }"#,
        )
        .expect("write settings");
        let path = tmp.path().join("week.txt");
        fs::write(&path, "2025年06月\n２３(M)\n０９:００ 本社 会議]\n").expect("write schedule");

        let settings = ParserSettings::from_json_file(&config).expect("settings");
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (_, records) = load_records(&path, &settings, today).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].activity, "会議]");

        let placements = layout_with(&records, &settings);
        assert!(placements.iter().any(|p| p.value == CellValue::Text("会議".into())));
        assert_eq!(preview_rows(&records, &settings)[0].activity, "会議");
    }

    #[test]
    fn load_records_reports_malformed_day() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("bad.txt");
        fs::write(&path, "2025年06月\n31(火)\n").expect("write schedule");

        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let err = load_records(&path, &ParserSettings::default(), today).unwrap_err();
        assert!(format!("{err:#}").contains("31(火)"));
    }
}

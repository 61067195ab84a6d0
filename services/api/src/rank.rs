use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use resident_rank::config::AppConfig;
use resident_rank::error::AppError;
use resident_rank::interviews::{
    export_file_name, write_final_order_csv, write_ranking_csv, ApplicantDetail,
    EvaluationImporter, ExportKind, SessionContext,
};
use resident_rank::telemetry::{self, LogSink};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// REDCap interview evaluation export (CSV)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Show the per-question breakdown for this applicant
    #[arg(long)]
    pub(crate) applicant: Option<String>,
    /// Write the scored and final ranking CSVs into this directory
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
    /// Date stamped into export file names (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        input,
        applicant,
        out_dir,
        today,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let table = EvaluationImporter::from_path(&input)?;
    let context = SessionContext::from_table(table, Local::now());
    let mut stdout = io::stdout().lock();
    render_ranking(&mut stdout, &context)?;

    if let Some(name) = applicant {
        let detail = context
            .detail(&name)
            .ok_or(AppError::UnknownApplicant(name))?;
        writeln!(stdout)?;
        render_detail(&mut stdout, &detail)?;
    }

    if let Some(dir) = out_dir {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        let written = write_exports(&context, &dir, config.export.file_prefix(), today)?;
        writeln!(stdout)?;
        for path in written {
            writeln!(stdout, "Wrote {}", path.display())?;
        }
    }

    Ok(())
}

pub(crate) fn render_ranking(out: &mut impl Write, context: &SessionContext) -> io::Result<()> {
    let summary = context.summary();
    writeln!(out, "{}", summary.caption)?;
    for warning in &summary.warnings {
        writeln!(out, "warning: {warning}")?;
    }

    let ranking = context.ranking();
    if ranking.is_empty() {
        return writeln!(out, "\nNo completed evaluations.");
    }

    let width = ranking
        .iter()
        .map(|row| row.applicant.chars().count())
        .max()
        .unwrap_or(0)
        .max("Applicant".len());
    writeln!(
        out,
        "\n{:>4}  {:<width$}  {:>13}  {:>13}",
        "Rank", "Applicant", "Average Score", "# Evaluations"
    )?;
    for row in &ranking {
        writeln!(
            out,
            "{:>4}  {:<width$}  {:>13}  {:>13}",
            row.rank,
            row.applicant,
            row.average_label(),
            row.evaluations
        )?;
    }
    Ok(())
}

pub(crate) fn render_detail(out: &mut impl Write, detail: &ApplicantDetail) -> io::Result<()> {
    writeln!(
        out,
        "{}  ({} evaluations)",
        detail.applicant, detail.evaluations
    )?;
    if detail.questions.is_empty() {
        writeln!(out, "- no numeric question scores")?;
    }
    for stat in &detail.questions {
        writeln!(out, "- {}: {}", stat.label, stat.display())?;
    }
    Ok(())
}

fn write_exports(
    context: &SessionContext,
    dir: &Path,
    prefix: &str,
    today: NaiveDate,
) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir)?;

    let ranking_path = dir.join(export_file_name(prefix, ExportKind::Ranking, today));
    std::fs::write(&ranking_path, write_ranking_csv(&context.ranking())?)?;

    let final_path = dir.join(export_file_name(prefix, ExportKind::FinalOrder, today));
    std::fs::write(
        &final_path,
        write_final_order_csv(&context.final_order().numbered())?,
    )?;

    info!(directory = %dir.display(), "ranking exports written");
    Ok(vec![ranking_path, final_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Cursor;

    const EXPORT: &str = "Applicant Name,Fit? (1-5),Total score,Complete?\n\
Jordan Lee,5,22,Complete\n\
Jordan Lee,4,21,Complete\n\
Riley Brooks,,,Complete\n";

    fn context() -> SessionContext {
        let table = EvaluationImporter::from_reader(Cursor::new(EXPORT)).expect("import");
        let loaded_at = Local
            .with_ymd_and_hms(2025, 11, 4, 9, 0, 0)
            .single()
            .expect("unambiguous local time");
        SessionContext::from_table(table, loaded_at)
    }

    fn render_to_string(render: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        render(&mut out).expect("render into memory");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn ranking_output_lists_every_applicant() {
        let rendered = render_to_string(|out| render_ranking(out, &context()));
        assert!(rendered.starts_with("Updated November 04, 2025"));
        assert!(rendered.contains("Jordan Lee"));
        assert!(rendered.contains("21.5"));
        assert!(rendered.contains("no data"));
    }

    #[test]
    fn write_failures_propagate() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let error = render_ranking(&mut Closed, &context()).expect_err("pipe closed");
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn detail_output_renders_stats() {
        let detail = context().detail("Jordan Lee").expect("present");
        let rendered = render_to_string(|out| render_detail(out, &detail));
        assert!(rendered.contains("Jordan Lee  (2 evaluations)"));
        assert!(rendered.contains("- Fit?: 4.5  (4\u{2013}5)"));
    }

    #[test]
    fn exports_land_in_the_output_directory() {
        let dir = std::env::temp_dir().join(format!("resident-rank-cli-{}", std::process::id()));
        let today = NaiveDate::from_ymd_opt(2025, 11, 4).expect("valid date");

        let written = write_exports(&context(), &dir, "ENT_Ranking", today).expect("written");
        assert_eq!(written[0], dir.join("ENT_Ranking_2025-11-04.csv"));
        assert_eq!(written[1], dir.join("ENT_Ranking_Final_2025-11-04.csv"));

        let final_order = std::fs::read_to_string(&written[1]).expect("readable");
        assert_eq!(
            final_order,
            "Final Rank,Applicant\n1,Jordan Lee\n2,Riley Brooks\n"
        );
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}

use chrono::{Local, NaiveDate};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use literacy_desk::attendance::{
    aggregate, daily_breakdown, parse_date, scoped_stats, AttendanceScope, AttendanceStats,
    DATE_FORMAT,
};
use literacy_desk::config::AppConfig;
use literacy_desk::db::{create_database_pool, seed_sample_data};
use literacy_desk::spreadsheet::codec::SheetFormat;
use literacy_desk::spreadsheet::transfer::{
    export_students_file, import_students_file, ExportTarget,
};
use literacy_desk::store::Store;
use literacy_desk::sync::ChangeBus;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::Command;

pub async fn open_store(config: &AppConfig) -> Result<Store> {
    let pool = create_database_pool(config).await?;
    Ok(Store::new(pool, ChangeBus::default()))
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let store = open_store(config).await?;
    let stats = build_headless_stats(&store, Local::now().date_naive()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }
    Ok(())
}

/// Runs one CLI subcommand to completion.
pub async fn run_command(config: &AppConfig, command: Command) -> Result<()> {
    let store = open_store(config).await?;
    let today = Local::now().date_naive();

    match command {
        Command::Stats {
            batch,
            from,
            to,
            json,
        } => {
            let report = build_stats_report(&store, batch, from.as_deref(), to.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render_stats_report(&report);
            }
        }
        Command::Import { path } => {
            let report = import_students_file(&store, &path, today)
                .await
                .wrap_err_with(|| format!("Import of {} failed", path.display()))?;
            println!("{}", report.summary());
            for rejected in &report.rejected {
                println!("  row {}: {}", rejected.row_number, rejected.reason);
            }
        }
        Command::Export { out, csv } => {
            let target = export_target(&config.export_dir, out, csv);
            let report = export_students_file(&store, &target, today)
                .await
                .wrap_err("Export failed")?;
            println!("{}", report.summary());
        }
        Command::Seed => {
            let summary = seed_sample_data(&store, today).await?;
            if summary.is_empty() {
                println!("Database already has students; nothing seeded");
            } else {
                println!(
                    "Seeded {} teachers, {} batches, {} students, {} attendance records, {} reports",
                    summary.teachers,
                    summary.batches,
                    summary.students,
                    summary.attendance,
                    summary.reports
                );
            }
        }
    }

    Ok(())
}

fn export_target(export_dir: &Path, out: Option<PathBuf>, csv: bool) -> ExportTarget {
    out.map_or_else(
        || ExportTarget::Directory {
            dir: export_dir.to_path_buf(),
            format: if csv {
                SheetFormat::Csv
            } else {
                SheetFormat::Workbook
            },
        },
        ExportTarget::File,
    )
}

#[derive(Debug, Serialize)]
struct HeadlessStats {
    today: String,
    total_students: usize,
    active_students: usize,
    total_teachers: usize,
    total_batches: usize,
    today_attendance: AttendanceStats,
    overall_attendance: AttendanceStats,
    by_batch: Vec<HeadlessBatch>,
    recent_transfers: Vec<HeadlessTransfer>,
}

#[derive(Debug, Serialize)]
struct HeadlessBatch {
    id: i64,
    name: String,
    batch_type: String,
    attendance: AttendanceStats,
}

#[derive(Debug, Serialize)]
struct HeadlessTransfer {
    kind: String,
    file_name: String,
    record_count: i64,
    created_at: String,
}

async fn build_headless_stats(store: &Store, today: NaiveDate) -> Result<HeadlessStats> {
    let students = store.fetch_students().await?;
    let teachers = store.fetch_teachers().await?;
    let batches = store.fetch_batches().await?;
    let attendance = store.fetch_attendance().await?;
    let logs = store.fetch_export_logs(5).await?;

    let by_batch = batches
        .iter()
        .map(|batch| HeadlessBatch {
            id: batch.id,
            name: batch.name.clone(),
            batch_type: batch.batch_type.label().to_string(),
            attendance: scoped_stats(&attendance, &AttendanceScope::for_batch(batch.id)),
        })
        .collect();

    let recent_transfers = logs
        .into_iter()
        .map(|log| HeadlessTransfer {
            kind: log.kind.as_str().to_string(),
            file_name: log.file_name,
            record_count: log.record_count,
            created_at: log.created_at,
        })
        .collect();

    Ok(HeadlessStats {
        today: today.format(DATE_FORMAT).to_string(),
        total_students: students.len(),
        active_students: students.iter().filter(|student| student.is_active).count(),
        total_teachers: teachers.len(),
        total_batches: batches.len(),
        today_attendance: scoped_stats(&attendance, &AttendanceScope::default().on_day(today)),
        overall_attendance: aggregate(&attendance),
        by_batch,
        recent_transfers,
    })
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nLiteracy Desk Stats ({})", stats.today);
    println!("=================================");
    println!(
        "Students: {} ({} active)",
        stats.total_students, stats.active_students
    );
    println!("Teachers: {}", stats.total_teachers);
    println!("Batches: {}", stats.total_batches);

    println!("\nAttendance today:");
    print_stats(&stats.today_attendance);
    println!("\nAttendance overall:");
    print_stats(&stats.overall_attendance);

    println!("\nBy batch:");
    for batch in &stats.by_batch {
        println!(
            "- {} ({}): {:.1}% of {} records",
            batch.name,
            batch.batch_type,
            batch.attendance.attendance_rate,
            batch.attendance.total_records
        );
    }

    println!("\nRecent transfers:");
    for transfer in &stats.recent_transfers {
        println!(
            "- {} | {} | {} rows | {}",
            transfer.kind, transfer.file_name, transfer.record_count, transfer.created_at
        );
    }
}

fn print_stats(stats: &AttendanceStats) {
    println!(
        "  present {} | absent {} | late {} | total {} | rate {:.1}%",
        stats.present_count,
        stats.absent_count,
        stats.late_count,
        stats.total_records,
        stats.attendance_rate
    );
}

#[derive(Debug, Serialize)]
struct StatsReport {
    batch_id: Option<i64>,
    from: Option<String>,
    to: Option<String>,
    stats: AttendanceStats,
    daily: Vec<(String, AttendanceStats)>,
}

fn parse_bound(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|raw| parse_date(raw).ok_or_else(|| eyre!("--{flag} expects YYYY-MM-DD, got {raw}")))
        .transpose()
}

async fn build_stats_report(
    store: &Store,
    batch_id: Option<i64>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<StatsReport> {
    let start = parse_bound(from, "from")?;
    let end = parse_bound(to, "to")?;

    let scope = AttendanceScope {
        batch_id,
        start,
        end,
    };
    let attendance = store.fetch_attendance().await?;
    let scoped = scope.apply(&attendance);
    info!(records = scoped.len(), "computing attendance stats");

    Ok(StatsReport {
        batch_id,
        from: start.map(|day| day.format(DATE_FORMAT).to_string()),
        to: end.map(|day| day.format(DATE_FORMAT).to_string()),
        stats: aggregate(&scoped),
        daily: daily_breakdown(scoped.iter().copied())
            .into_iter()
            .map(|(day, stats)| (day.format(DATE_FORMAT).to_string(), stats))
            .collect(),
    })
}

fn render_stats_report(report: &StatsReport) {
    let batch = report
        .batch_id
        .map_or_else(|| "all batches".to_string(), |id| format!("batch {id}"));
    let from = report.from.as_deref().unwrap_or("start");
    let to = report.to.as_deref().unwrap_or("today");
    println!("Attendance for {batch}, {from} to {to}");
    print_stats(&report.stats);

    if !report.daily.is_empty() {
        println!("\nBy day:");
        for (day, stats) in &report.daily {
            println!(
                "  {day}: {}/{} present ({:.1}%)",
                stats.present_count, stats.total_records, stats.attendance_rate
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use literacy_desk::config::database_url_for;
    use literacy_desk::db::create_database_pool_with_url;

    async fn seeded_store(dir: &Path) -> Result<(Store, NaiveDate)> {
        let url = database_url_for(&dir.join("literacy.db"))?;
        let store = Store::new(create_database_pool_with_url(&url).await?, ChangeBus::default());
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).ok_or_else(|| eyre!("bad date"))?;
        seed_sample_data(&store, today).await?;
        Ok((store, today))
    }

    #[tokio::test]
    async fn headless_stats_cover_seeded_data() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let (store, today) = seeded_store(dir.path()).await?;

        let stats = build_headless_stats(&store, today).await?;

        assert_eq!(stats.total_students, 9);
        assert_eq!(stats.active_students, 8);
        assert_eq!(stats.by_batch.len(), 3);
        assert_eq!(stats.today_attendance.total_records, 9);
        assert_eq!(stats.overall_attendance.total_records, 63);
        let json = serde_json::to_value(&stats)?;
        assert!(json["today_attendance"]["attendance_rate"].is_number());
        Ok(())
    }

    #[tokio::test]
    async fn stats_report_scopes_by_batch_and_dates() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let (store, _) = seeded_store(dir.path()).await?;
        let batch_id = store.fetch_batches().await?[0].id;

        let report =
            build_stats_report(&store, Some(batch_id), Some("2024-07-14"), Some("2024-07-15"))
                .await?;

        // Three students over two days
        assert_eq!(report.stats.total_records, 6);
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].0, "2024-07-14");
        Ok(())
    }

    #[tokio::test]
    async fn bad_date_bound_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let (store, _) = seeded_store(dir.path()).await?;

        assert!(build_stats_report(&store, None, Some("15/07/2024"), None)
            .await
            .is_err());
        Ok(())
    }

    #[test]
    fn export_target_defaults_to_directory() {
        let dir = Path::new("exports");
        assert_eq!(
            export_target(dir, None, true),
            ExportTarget::Directory {
                dir: PathBuf::from("exports"),
                format: SheetFormat::Csv
            }
        );
        assert_eq!(
            export_target(dir, Some(PathBuf::from("out.xlsx")), false),
            ExportTarget::File(PathBuf::from("out.xlsx"))
        );
    }
}

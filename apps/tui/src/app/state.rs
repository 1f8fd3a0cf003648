use crate::app::actions::AppActions;
use crate::app::input::helpers::wrap_increment;
use chrono::{Local, NaiveDate};
use color_eyre::Result;
use literacy_desk::attendance::{
    aggregate, aggregate_by_student, scoped_stats, AttendanceScope, AttendanceStats, DATE_FORMAT,
};
use literacy_desk::auth::Credentials;
use literacy_desk::config::AppConfig;
use literacy_desk::db::models::{
    AttendanceParams, AttendanceRecord, BatchRecord, DailyReportParams, DailyReportRecord,
    ExportLogRecord, StudentRecord, TeacherRecord,
};
use literacy_desk::domain::{AttendanceStatus, BatchType, Table, ALL};
use literacy_desk::roster::{filter, RosterField, RosterQuery};
use literacy_desk::spreadsheet::codec::SheetFormat;
use literacy_desk::spreadsheet::transfer::{ExportReport, ImportReport};
use literacy_desk::sync::{drain_pending, RefetchTask};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Rows in the recent-transfers panel.
pub const RECENT_TRANSFERS: i64 = 10;

pub const STATUS_OPTIONS: [&str; 3] = [ALL, "active", "inactive"];

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppScreen {
    Login,
    Main,
    Students,
    Teachers,
    Batches,
    Attendance,
    Reports,
    EditReport,
    Transfer,
}

impl AppScreen {
    /// Screens reachable from the main menu, in menu order.
    pub const MENU: [Self; 6] = [
        Self::Students,
        Self::Teachers,
        Self::Batches,
        Self::Attendance,
        Self::Reports,
        Self::Transfer,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Main => "Dashboard",
            Self::Students => "Students",
            Self::Teachers => "Teachers",
            Self::Batches => "Batches",
            Self::Attendance => "Attendance",
            Self::Reports => "Daily Reports",
            Self::EditReport => "Report",
            Self::Transfer => "Import / Export",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    pub error: Option<String>,
}

impl LoginState {
    pub const fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            field: LoginField::Username,
            error: None,
        }
    }

    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// Selection and free-text search of one list screen.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub selected: usize,
    pub search: String,
    pub searching: bool,
}

impl ListView {
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.searching = false;
        self.selected = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Title,
    Description,
    TaskType,
}

impl ReportField {
    pub const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::TaskType,
            Self::TaskType => Self::Title,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Title => Self::TaskType,
            Self::Description => Self::Title,
            Self::TaskType => Self::Description,
        }
    }
}

/// Holds a daily report being created or edited
#[derive(Debug, Clone)]
pub struct ReportForm {
    pub editing_id: Option<i64>,
    pub field: ReportField,
    pub title: String,
    pub description: String,
    pub task_type: String,
    pub report_date: String,
}

impl ReportForm {
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            editing_id: None,
            field: ReportField::Title,
            title: String::new(),
            description: String::new(),
            task_type: String::new(),
            report_date: today.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn from_report(report: &DailyReportRecord) -> Self {
        Self {
            editing_id: Some(report.id),
            field: ReportField::Title,
            title: report.title.clone(),
            description: report.description.clone(),
            task_type: report.task_type.clone(),
            report_date: report.report_date.clone(),
        }
    }

    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            ReportField::Title => &mut self.title,
            ReportField::Description => &mut self.description,
            ReportField::TaskType => &mut self.task_type,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.task_type.trim().is_empty()
    }

    pub fn to_params(&self, created_by: &str) -> DailyReportParams {
        DailyReportParams {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            task_type: self.task_type.trim().to_lowercase(),
            report_date: self.report_date.clone(),
            created_by: created_by.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferRequest {
    Import(PathBuf),
    Export(SheetFormat),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Imported(ImportReport),
    Exported(ExportReport),
    Failed(String),
}

/// What the last drained refetch reloaded and how stale the copy had been.
#[derive(Debug, Clone)]
pub struct RefetchSummary {
    pub tables: Vec<Table>,
    pub task_count: usize,
    pub staleness: Duration,
    pub at: Instant,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub credentials: Credentials,
    pub login: LoginState,
    pub signed_in_as: Option<String>,
    pub actions: AppActions,
    pub refetch_rx: Option<mpsc::Receiver<RefetchTask>>,
    pub last_refetch: Option<RefetchSummary>,
    pub menu_index: usize,
    pub today: NaiveDate,
    pub students: Vec<StudentRecord>,
    pub teachers: Vec<TeacherRecord>,
    pub batches: Vec<BatchRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub reports: Vec<DailyReportRecord>,
    pub export_logs: Vec<ExportLogRecord>,
    pub students_view: ListView,
    pub student_course_filter: usize,
    pub student_batch_filter: usize,
    pub student_status_filter: usize,
    pub show_student_details: bool,
    pub teachers_view: ListView,
    pub teacher_specialization_filter: usize,
    pub batches_view: ListView,
    pub batch_type_filter: usize,
    pub attendance_batch_index: usize,
    pub attendance_date: NaiveDate,
    pub attendance_selected: usize,
    pub reports_view: ListView,
    pub report_form: Option<ReportForm>,
    pub transfer_path: String,
    pub transfer_editing: bool,
    pub pending_transfer: Option<TransferRequest>,
    pub transfer_running: bool,
    pub last_transfer: Option<TransferOutcome>,
}

impl App {
    pub fn new(credentials: Credentials) -> Self {
        let today = Local::now().date_naive();
        Self {
            running: true,
            screen: AppScreen::Login,
            show_help: false,
            status_message: String::new(),
            animation_counter: 0.0,
            last_frame: Instant::now(),
            credentials,
            login: LoginState::new(),
            signed_in_as: None,
            actions: AppActions::new(),
            refetch_rx: None,
            last_refetch: None,
            menu_index: 0,
            today,
            students: Vec::new(),
            teachers: Vec::new(),
            batches: Vec::new(),
            attendance: Vec::new(),
            reports: Vec::new(),
            export_logs: Vec::new(),
            students_view: ListView::default(),
            student_course_filter: 0,
            student_batch_filter: 0,
            student_status_filter: 0,
            show_student_details: false,
            teachers_view: ListView::default(),
            teacher_specialization_filter: 0,
            batches_view: ListView::default(),
            batch_type_filter: 0,
            attendance_batch_index: 0,
            attendance_date: today,
            attendance_selected: 0,
            reports_view: ListView::default(),
            report_form: None,
            transfer_path: String::new(),
            transfer_editing: false,
            pending_transfer: None,
            transfer_running: false,
            last_transfer: None,
        }
    }

    pub async fn initialize_db(&mut self, config: &AppConfig) -> Result<()> {
        self.refetch_rx = Some(self.actions.initialize(config).await?);
        self.refetch_all().await
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Cycles between 0 and 2*PI; drives the cursor blink
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        self.today = Local::now().date_naive();
    }

    /// Checks the login form; on success the dashboard opens.
    pub fn submit_login(&mut self) -> bool {
        if self
            .credentials
            .authenticate(&self.login.username, &self.login.password)
        {
            info!(user = self.login.username.trim(), "signed in");
            self.signed_in_as = Some(self.login.username.trim().to_string());
            self.login = LoginState::new();
            self.screen = AppScreen::Main;
            self.status_message.clear();
            true
        } else {
            warn!(user = self.login.username.trim(), "rejected sign-in");
            self.login.password.clear();
            self.login.field = LoginField::Password;
            self.login.error = Some("Invalid username or password".to_string());
            false
        }
    }

    pub fn sign_out(&mut self) {
        self.signed_in_as = None;
        self.login = LoginState::new();
        self.screen = AppScreen::Login;
        self.show_help = false;
    }

    pub fn operator(&self) -> &str {
        self.signed_in_as
            .as_deref()
            .unwrap_or_else(|| self.credentials.username())
    }

    /// Reports a failed action without touching local data.
    pub fn report_error(&mut self, context: &str, e: &color_eyre::Report) {
        error!(error = %e, "{context}");
        self.status_message = format!("Error: {context}: {e}");
    }

    // -----------------------------------------------------------------
    // Refetching
    // -----------------------------------------------------------------

    /// Drains the refetch queue and reloads each touched table once.
    pub async fn apply_pending_refetches(&mut self) {
        let Some(rx) = self.refetch_rx.as_mut() else {
            return;
        };
        let plan = drain_pending(rx);
        if plan.is_empty() {
            return;
        }

        let now = Instant::now();
        let staleness = plan.staleness(now);
        info!(
            tables = ?plan.tables,
            tasks = plan.task_count,
            staleness_ms = u64::try_from(staleness.as_millis()).unwrap_or(u64::MAX),
            "refetching"
        );

        for table in &plan.tables {
            if let Err(e) = self.reload(*table).await {
                self.report_error(&format!("Failed to reload {}", table.as_str()), &e);
            }
        }

        self.last_refetch = Some(RefetchSummary {
            tables: plan.tables.into_iter().collect(),
            task_count: plan.task_count,
            staleness,
            at: now,
        });
    }

    pub async fn refetch_all(&mut self) -> Result<()> {
        for table in Table::ALL {
            self.reload(table).await?;
        }
        Ok(())
    }

    async fn reload(&mut self, table: Table) -> Result<()> {
        match table {
            Table::Students => {
                self.students = self.actions.fetch_students().await?;
                let len = self.visible_students().len();
                self.students_view.clamp(len);
            }
            Table::Teachers => {
                self.teachers = self.actions.fetch_teachers().await?;
                let len = self.visible_teachers().len();
                self.teachers_view.clamp(len);
            }
            Table::Batches => {
                self.batches = self.actions.fetch_batches().await?;
                let len = self.visible_batches().len();
                self.batches_view.clamp(len);
            }
            Table::Attendance => {
                self.attendance = self.actions.fetch_attendance().await?;
            }
            Table::DailyReports => {
                self.reports = self.actions.fetch_daily_reports().await?;
                self.reports_view.clamp(self.reports.len());
            }
            Table::ExportLogs => {
                self.export_logs = self.actions.fetch_export_logs(RECENT_TRANSFERS).await?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Students
    // -----------------------------------------------------------------

    pub fn course_options() -> Vec<&'static str> {
        std::iter::once(ALL)
            .chain(BatchType::ALL.iter().map(|kind| kind.as_str()))
            .collect()
    }

    /// "all" followed by every batch id.
    pub fn batch_filter_options(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(self.batches.iter().map(|batch| batch.id.to_string()))
            .collect()
    }

    pub fn student_query(&self) -> RosterQuery {
        let course = Self::course_options()
            .get(self.student_course_filter)
            .copied()
            .unwrap_or(ALL);
        let batch = self
            .batch_filter_options()
            .get(self.student_batch_filter)
            .cloned()
            .unwrap_or_else(|| ALL.to_string());
        let status = STATUS_OPTIONS
            .get(self.student_status_filter)
            .copied()
            .unwrap_or(ALL);

        RosterQuery::new(self.students_view.search.clone())
            .with_filter(RosterField::Course, course)
            .with_filter(RosterField::Batch, batch)
            .with_filter(RosterField::Status, status)
    }

    pub fn visible_students(&self) -> Vec<&StudentRecord> {
        filter(&self.students, &self.student_query())
    }

    pub fn selected_student(&self) -> Option<&StudentRecord> {
        self.visible_students()
            .get(self.students_view.selected)
            .copied()
    }

    pub fn cycle_student_course(&mut self) {
        self.student_course_filter =
            wrap_increment(self.student_course_filter, Self::course_options().len());
        self.students_view.selected = 0;
    }

    pub fn cycle_student_batch(&mut self) {
        self.student_batch_filter =
            wrap_increment(self.student_batch_filter, self.batches.len() + 1);
        self.students_view.selected = 0;
    }

    pub fn cycle_student_status(&mut self) {
        self.student_status_filter =
            wrap_increment(self.student_status_filter, STATUS_OPTIONS.len());
        self.students_view.selected = 0;
    }

    pub fn student_filter_summary(&self) -> String {
        let course = Self::course_options()
            .get(self.student_course_filter)
            .copied()
            .unwrap_or(ALL);
        let batch = match self.student_batch_filter {
            0 => ALL.to_string(),
            index => self
                .batches
                .get(index - 1)
                .map_or_else(|| ALL.to_string(), |batch| batch.name.clone()),
        };
        let status = STATUS_OPTIONS
            .get(self.student_status_filter)
            .copied()
            .unwrap_or(ALL);
        format!("course: {course}  batch: {batch}  status: {status}")
    }

    // -----------------------------------------------------------------
    // Teachers and batches
    // -----------------------------------------------------------------

    /// Distinct specializations across all teachers, sorted.
    pub fn specialization_options(&self) -> Vec<String> {
        let distinct: BTreeSet<String> = self
            .teachers
            .iter()
            .flat_map(TeacherRecord::specializations)
            .map(str::to_lowercase)
            .collect();
        std::iter::once(ALL.to_string()).chain(distinct).collect()
    }

    pub fn teacher_query(&self) -> RosterQuery {
        let specialization = self
            .specialization_options()
            .get(self.teacher_specialization_filter)
            .cloned()
            .unwrap_or_else(|| ALL.to_string());
        RosterQuery::new(self.teachers_view.search.clone())
            .with_filter(RosterField::Specialization, specialization)
    }

    pub fn visible_teachers(&self) -> Vec<&TeacherRecord> {
        filter(&self.teachers, &self.teacher_query())
    }

    pub fn selected_teacher(&self) -> Option<&TeacherRecord> {
        self.visible_teachers()
            .get(self.teachers_view.selected)
            .copied()
    }

    pub fn cycle_teacher_specialization(&mut self) {
        self.teacher_specialization_filter = wrap_increment(
            self.teacher_specialization_filter,
            self.specialization_options().len(),
        );
        self.teachers_view.selected = 0;
    }

    pub fn batch_type_options() -> Vec<&'static str> {
        Self::course_options()
    }

    pub fn batch_query(&self) -> RosterQuery {
        let kind = Self::batch_type_options()
            .get(self.batch_type_filter)
            .copied()
            .unwrap_or(ALL);
        RosterQuery::new(self.batches_view.search.clone()).with_filter(RosterField::BatchType, kind)
    }

    pub fn visible_batches(&self) -> Vec<&BatchRecord> {
        filter(&self.batches, &self.batch_query())
    }

    pub fn selected_batch(&self) -> Option<&BatchRecord> {
        self.visible_batches()
            .get(self.batches_view.selected)
            .copied()
    }

    pub fn cycle_batch_type(&mut self) {
        self.batch_type_filter =
            wrap_increment(self.batch_type_filter, Self::batch_type_options().len());
        self.batches_view.selected = 0;
    }

    pub fn teacher_name(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.teachers.iter().find(|teacher| teacher.id == id))
            .map_or("-", |teacher| teacher.name.as_str())
    }

    pub fn batch_name(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.batches.iter().find(|batch| batch.id == id))
            .map_or("-", |batch| batch.name.as_str())
    }

    // -----------------------------------------------------------------
    // Attendance
    // -----------------------------------------------------------------

    /// `None` means every batch.
    pub fn attendance_batch(&self) -> Option<&BatchRecord> {
        match self.attendance_batch_index {
            0 => None,
            index => self.batches.get(index - 1),
        }
    }

    pub fn cycle_attendance_batch(&mut self) {
        self.attendance_batch_index =
            wrap_increment(self.attendance_batch_index, self.batches.len() + 1);
        self.attendance_selected = 0;
    }

    pub fn attendance_scope(&self) -> AttendanceScope {
        AttendanceScope {
            batch_id: self.attendance_batch().map(|batch| batch.id),
            start: None,
            end: None,
        }
    }

    /// Active students of the selected batch, or of every batch.
    pub fn attendance_roster(&self) -> Vec<&StudentRecord> {
        let batch_id = self.attendance_batch().map(|batch| batch.id);
        self.students
            .iter()
            .filter(|student| student.is_active)
            .filter(|student| batch_id.map_or(true, |id| student.batch_id == Some(id)))
            .collect()
    }

    pub fn selected_attendance_student(&self) -> Option<&StudentRecord> {
        self.attendance_roster()
            .get(self.attendance_selected)
            .copied()
    }

    /// Upsert parameters for marking the selected student on the selected
    /// day, with the student's name. The row keeps the student's own batch.
    pub fn attendance_params(
        &self,
        status: AttendanceStatus,
    ) -> Option<(AttendanceParams, String)> {
        let student = self.selected_attendance_student()?;
        let params = AttendanceParams {
            student_id: student.id,
            batch_id: student.batch_id,
            date: self.attendance_date_string(),
            status,
            notes: None,
            marked_by: Some(self.operator().to_string()),
        };
        Some((params, student.name.clone()))
    }

    /// Per-student stats over the batch in view, all dates.
    pub fn attendance_student_rates(&self) -> BTreeMap<i64, AttendanceStats> {
        aggregate_by_student(self.attendance_scope().apply(&self.attendance))
    }

    pub fn attendance_date_string(&self) -> String {
        self.attendance_date.format(DATE_FORMAT).to_string()
    }

    pub fn status_on(&self, student_id: i64, date: &str) -> Option<&AttendanceRecord> {
        self.attendance
            .iter()
            .find(|record| record.student_id == student_id && record.date == date)
    }

    pub fn attendance_day_stats(&self) -> AttendanceStats {
        scoped_stats(
            &self.attendance,
            &self.attendance_scope().on_day(self.attendance_date),
        )
    }

    /// The seven days ending on the selected date.
    pub fn attendance_week_stats(&self) -> AttendanceStats {
        let start = self.attendance_date - chrono::Duration::days(6);
        scoped_stats(
            &self.attendance,
            &self
                .attendance_scope()
                .between(Some(start), Some(self.attendance_date)),
        )
    }

    // -----------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------

    pub fn today_stats(&self) -> AttendanceStats {
        scoped_stats(&self.attendance, &AttendanceScope::default().on_day(self.today))
    }

    pub fn overall_stats(&self) -> AttendanceStats {
        aggregate(&self.attendance)
    }

    pub fn batch_rates(&self) -> Vec<(&str, AttendanceStats)> {
        self.batches
            .iter()
            .map(|batch| {
                (
                    batch.name.as_str(),
                    scoped_stats(&self.attendance, &AttendanceScope::for_batch(batch.id)),
                )
            })
            .collect()
    }

    pub fn active_student_count(&self) -> usize {
        self.students.iter().filter(|student| student.is_active).count()
    }

    pub fn status_label(record: Option<&AttendanceRecord>) -> &'static str {
        match record.map(AttendanceRecord::parsed_status) {
            None => "-",
            Some(None) => "?",
            Some(Some(status)) => AttendanceStatus::label(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Credentials::new("admin", "admin123"))
    }

    fn student(id: i64, name: &str, batch_id: Option<i64>, active: bool) -> StudentRecord {
        StudentRecord {
            id,
            name: name.to_string(),
            age: None,
            gender: None,
            contact_phone: None,
            guardian_name: None,
            guardian_phone: None,
            address: None,
            aadhaar_number: format!("{id:012}"),
            course_enrolled: "coding".to_string(),
            batch_id,
            admission_date: "2024-06-01".to_string(),
            is_active: active,
            created_at: "2024-06-01 10:00:00".to_string(),
        }
    }

    fn batch(id: i64, name: &str) -> BatchRecord {
        BatchRecord {
            id,
            name: name.to_string(),
            batch_type: BatchType::Coding,
            start_time: "09:00".to_string(),
            end_time: "11:00".to_string(),
            primary_teacher_id: None,
            secondary_teacher_id: None,
            room: None,
        }
    }

    #[test]
    fn login_moves_to_dashboard_only_with_matching_credentials() {
        let mut app = app();
        app.login.username = "admin".to_string();
        app.login.password = "wrong".to_string();
        assert!(!app.submit_login());
        assert_eq!(app.screen, AppScreen::Login);
        assert!(app.login.error.is_some());
        assert!(app.login.password.is_empty());

        app.login.password = "admin123".to_string();
        assert!(app.submit_login());
        assert_eq!(app.screen, AppScreen::Main);
        assert_eq!(app.operator(), "admin");
    }

    #[test]
    fn student_filters_cycle_through_batches() {
        let mut app = app();
        app.batches = vec![batch(1, "Morning"), batch(2, "Evening")];
        app.students = vec![
            student(1, "Asha", Some(1), true),
            student(2, "Bilal", Some(2), true),
            student(3, "Chitra", Some(1), false),
        ];

        assert_eq!(app.visible_students().len(), 3);

        app.cycle_student_batch();
        let ids: Vec<i64> = app.visible_students().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);

        app.cycle_student_status();
        let ids: Vec<i64> = app.visible_students().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);

        app.cycle_student_batch();
        app.cycle_student_batch();
        assert_eq!(app.student_batch_filter, 0);
        assert_eq!(app.visible_students().len(), 2);
    }

    #[test]
    fn attendance_roster_skips_inactive_students() {
        let mut app = app();
        app.batches = vec![batch(1, "Morning")];
        app.students = vec![
            student(1, "Asha", Some(1), true),
            student(2, "Bilal", None, true),
            student(3, "Chitra", Some(1), false),
        ];

        assert_eq!(app.attendance_roster().len(), 2);
        app.cycle_attendance_batch();
        let ids: Vec<i64> = app.attendance_roster().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
    }

    fn record(
        id: i64,
        student_id: i64,
        batch_id: Option<i64>,
        date: &str,
        status: &str,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id,
            student_id,
            batch_id,
            date: date.to_string(),
            status: status.to_string(),
            notes: None,
            marked_by: None,
        }
    }

    #[test]
    fn marking_keeps_the_students_own_batch() {
        let mut app = app();
        app.batches = vec![batch(1, "Morning")];
        app.students = vec![
            student(1, "Asha", Some(1), true),
            student(2, "Bilal", None, true),
        ];
        app.attendance_date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default();

        // All batches: the unbatched student is listed and marked without a batch
        app.attendance_selected = 1;
        let (params, name) = app
            .attendance_params(AttendanceStatus::Late)
            .unwrap_or_else(|| panic!("no student selected"));
        assert_eq!(name, "Bilal");
        assert_eq!(params.batch_id, None);
        assert_eq!(params.date, "2024-07-15");
        assert_eq!(params.marked_by.as_deref(), Some("admin"));

        // Batch view: only batch members are listed
        app.cycle_attendance_batch();
        let (params, name) = app
            .attendance_params(AttendanceStatus::Present)
            .unwrap_or_else(|| panic!("no student selected"));
        assert_eq!(name, "Asha");
        assert_eq!(params.batch_id, Some(1));
    }

    #[test]
    fn student_rates_follow_the_batch_in_view() {
        let mut app = app();
        app.batches = vec![batch(1, "Morning")];
        app.attendance = vec![
            record(1, 1, Some(1), "2024-07-14", "present"),
            record(2, 1, Some(1), "2024-07-15", "absent"),
            record(3, 2, None, "2024-07-15", "present"),
        ];

        let all = app.attendance_student_rates();
        assert_eq!(all.len(), 2);
        assert!((all[&1].attendance_rate - 50.0).abs() < f64::EPSILON);

        app.cycle_attendance_batch();
        let scoped = app.attendance_student_rates();
        assert_eq!(scoped.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn report_form_requires_title_and_type() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default();
        let mut form = ReportForm::blank(today);
        assert!(!form.is_complete());

        form.active_input().push_str("Lab visit");
        form.field = form.field.next().next();
        form.active_input().push_str(" Outreach ");
        assert!(form.is_complete());

        let params = form.to_params("admin");
        assert_eq!(params.task_type, "outreach");
        assert_eq!(params.report_date, "2024-07-15");
    }

    #[test]
    fn list_view_clamps_after_shrink() {
        let mut view = ListView {
            selected: 5,
            ..ListView::default()
        };
        view.clamp(3);
        assert_eq!(view.selected, 2);
        view.clamp(0);
        assert_eq!(view.selected, 0);
    }
}

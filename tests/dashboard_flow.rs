use attendance_desk_lib::models::{fields, EmployeeDraft, RegisterPatch, TimeOfDay};
use attendance_desk_lib::pagination::PageLabel;
use attendance_desk_lib::report::YearMonth;
use attendance_desk_lib::screens::{results_summary, ScreenEvent};
use attendance_desk_lib::seed;
use attendance_desk_lib::{Dashboard, DashboardConfig};
use chrono::NaiveDate;
use serde_json::json;
use tokio::time::{advance, Duration, Instant};

fn dashboard(dir: &std::path::Path) -> Dashboard {
    let config = DashboardConfig::default()
        .merged(json!({
            "fetchLatencyMs": 0,
            "registerSaveLatencyMs": 0,
            "settingsSaveLatencyMs": 0
        }))
        .expect("config");
    Dashboard::new(dir, config).expect("dashboard")
}

#[tokio::test(start_paused = true)]
async fn department_filter_then_debounced_search_narrows_daily_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = dashboard(dir.path());
    let mut view = dashboard.daily_attendance();

    view.set_filter(fields::DEPARTMENT, Some("Engineering"));
    for text in ["j", "jo", "joh", "john"] {
        view.input_search(text);
        advance(Duration::from_millis(50)).await;
    }
    let runs = view.filter_runs();
    let typed_at = Instant::now();
    assert!(view.settle().await);

    let waited = Instant::now() - typed_at;
    assert!(waited >= Duration::from_millis(250) && waited < Duration::from_millis(252));
    assert_eq!(view.filter_runs(), runs + 1);

    let visible = view.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "E-1003");
    assert_eq!(view.state().total_pages, 1);
    assert_eq!(view.labels(), vec![PageLabel::Page(1)]);
    assert_eq!(results_summary(&view), "Showing 1-1 of 1 record for search: \"john\"");
}

#[tokio::test]
async fn adding_a_duplicate_name_keeps_both_employees() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut dashboard = dashboard(dir.path());
    let mut screen = dashboard.employees_screen();
    let draft = EmployeeDraft {
        name: "Bob Smith".to_string(),
        department: "HR".to_string(),
        role: "Coordinator".to_string(),
        joined: NaiveDate::from_ymd_opt(2025, 4, 1),
        ..EmployeeDraft::default()
    };

    let added = screen.add(dashboard.employees_mut(), draft).expect("valid draft");
    screen.view_mut().apply_search("bob smith");
    let ids: Vec<_> = screen.view().visible().iter().map(|employee| employee.id).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], added.id);
    assert_eq!(dashboard.employees().len(), 5);

    let stats = dashboard.daily_stats(seed::seed_date()).await;
    assert_eq!(stats.total_employees, 5);
}

#[tokio::test]
async fn register_edits_are_committed_through_the_service() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = dashboard(dir.path());
    let mut register = dashboard.register_screen();

    register.update_row("E-1", RegisterPatch::out_time(TimeOfDay::new(18, 30).expect("time")));
    register.save().expect("save started");
    match register.next_event().await {
        Some(ScreenEvent::SaveFinished(outcome)) => assert!(outcome.success),
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(!register.is_dirty());
    assert!(register.save().is_none());
}

#[tokio::test]
async fn export_today_writes_filtered_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dashboard = dashboard(dir.path());
    let mut view = dashboard.daily_attendance();
    view.set_filter(fields::STATUS, Some("Present"));

    let response = dashboard.export_today(&view).expect("export");
    assert!(response.path.ends_with("attendance-today.csv"));
    let written = std::fs::read_to_string(&response.path).expect("read export");
    assert_eq!(
        written,
        "\"ID\",\"Name\",\"Status\",\"In\",\"Out\"\n\
         \"E-1003\",\"John Smith\",\"Present\",\"09:00\",\"17:00\"\n\
         \"E-1004\",\"Sarah Johnson\",\"Present\",\"09:30\",\"17:30\"\n\
         \"E-1005\",\"Robert Davis\",\"Present\",\"14:00\",\"22:00\""
    );
}

#[tokio::test]
async fn monthly_report_and_settings_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut dashboard = dashboard(dir.path());

    let month: YearMonth = "2025-09".parse().expect("month");
    let report = dashboard.monthly_report(month).await;
    assert_eq!(report.summary.working_days, 22);
    assert_eq!(report.departments.len(), 3);

    let mut form = dashboard.settings_form();
    form.apply_update(json!({"company": "Initech", "timezone": "EST"}))
        .expect("update");
    dashboard.save_settings(&mut form).await.expect("saved");
    assert_eq!(dashboard.settings().company, "Initech");
    assert!(form.saved_visible());
}

#[test]
fn config_file_in_app_dir_is_picked_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("dashboard.json"),
        r#"{"defaultPageSize": 5, "exportDir": null}"#,
    )
    .expect("write config");
    let dashboard = Dashboard::open(dir.path()).expect("dashboard");
    assert_eq!(dashboard.config().default_page_size, 5);
    assert_eq!(dashboard.export_dir(), dir.path().join("exports"));
    assert_eq!(dashboard.employees_screen().view().page().items.len(), 4);
}

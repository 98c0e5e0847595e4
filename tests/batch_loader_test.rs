// ==========================================
// 批量加载器集成测试
// ==========================================
// 验证:
// - 查询数与服务数量无关（N = 1 / 10 / 100）
// - 空服务集合不发出查询
// - 批量路径与逐个服务路径逐项一致
// ==========================================

mod test_helpers;

use hospital_productivity::datasource::{ProductivityDataSource, RealStore, SyntheticStore};
use hospital_productivity::domain::types::{ReportPeriod, Weekday};
use hospital_productivity::engine::{BatchLoader, MonthCalendar, ProductivityEngine};
use std::sync::Arc;

const YEAR: i32 = 2024;
const MONTH: u32 = 7;

#[tokio::test]
async fn test_batch_query_count_is_constant() {
    let mut counts = Vec::new();

    for (unit_id, n) in [(1i64, 1i64), (2, 10), (3, 100)] {
        let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
        let conn = test_helpers::open_test_connection(&db_path).unwrap();
        test_helpers::seed_unit_with_services(&conn, unit_id, n, YEAR, MONTH);

        let store = RealStore::open(&db_path).unwrap();
        let services = store.find_services(unit_id).await.unwrap();
        assert_eq!(services.len() as i64, n);
        let ids: Vec<i64> = services.iter().map(|s| s.id).collect();

        let before = store.queries_issued();
        let batch = BatchLoader::new(&store)
            .load(unit_id, &ids, ReportPeriod::new(YEAR, MONTH))
            .await
            .unwrap();
        let issued = store.queries_issued() - before;

        assert_eq!(batch.executions.len() as i64, n);
        assert_eq!(batch.capacity.len() as i64, n);
        assert!(issued <= 2, "N={} 发出了 {} 条查询", n, issued);
        counts.push(issued);
    }

    assert!(counts.windows(2).all(|w| w[0] == w[1]), "查询数随 N 变化: {:?}", counts);
}

#[tokio::test]
async fn test_full_report_query_count_is_constant() {
    let mut counts = Vec::new();

    for n in [1i64, 10, 100] {
        let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
        let conn = test_helpers::open_test_connection(&db_path).unwrap();
        test_helpers::seed_unit_with_services(&conn, 5, n, YEAR, MONTH);

        let engine = ProductivityEngine::new(Arc::new(RealStore::open(&db_path).unwrap()));
        let report = engine.build_report(5, ReportPeriod::new(YEAR, MONTH)).await.unwrap();
        assert_eq!(report.summary.service_count as i64, n);
        counts.push(engine.source().queries_issued());
    }

    assert_eq!(counts, vec![counts[0]; 3]);
    assert!(counts[0] <= 6);
}

#[tokio::test]
async fn test_empty_service_set_issues_no_queries() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let store = RealStore::open(&db_path).unwrap();

    let batch = BatchLoader::new(&store)
        .load(1, &[], ReportPeriod::new(YEAR, MONTH))
        .await
        .unwrap();

    assert!(batch.executions.is_empty());
    assert!(batch.capacity.is_empty());
    assert_eq!(store.queries_issued(), 0);

    let synthetic = SyntheticStore::new();
    BatchLoader::new(&synthetic)
        .load(1, &[], ReportPeriod::new(YEAR, MONTH))
        .await
        .unwrap();
    assert_eq!(synthetic.queries_issued(), 0);
}

#[tokio::test]
async fn test_morning_and_afternoon_capacity_merge() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    test_helpers::insert_unit(&conn, 1, "Unidade");
    test_helpers::insert_service(&conn, 10, 1, None, "Consulta", Some(100));
    test_helpers::insert_capacity(&conn, 1, 10, "segunda-manha", 10);
    test_helpers::insert_capacity(&conn, 1, 10, "segunda-tarde", 8);
    test_helpers::insert_capacity(&conn, 1, 10, "plantão extra", 50);

    let store = RealStore::open(&db_path).unwrap();
    let batch = BatchLoader::new(&store)
        .load(1, &[10], ReportPeriod::new(YEAR, MONTH))
        .await
        .unwrap();

    let capacity = batch.capacity_for(10).unwrap();
    assert_eq!(capacity.for_weekday(Weekday::Monday), 18);
    assert_eq!(capacity.unmatched_labels, vec!["plantão extra".to_string()]);
    assert!(batch.executions_for(10).is_empty());
}

#[tokio::test]
async fn test_batch_matches_single_service_path() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    test_helpers::seed_unit_with_services(&conn, 7, 12, YEAR, MONTH);
    // 其他月份 / 其他单元的数据不能混入
    test_helpers::insert_execution(&conn, 7, 7001, YEAR, MONTH + 1, 3, 99, 99, 0);
    test_helpers::insert_execution(&conn, 8, 7001, YEAR, MONTH, 3, 99, 99, 0);

    let period = ReportPeriod::new(YEAR, MONTH);
    let engine = ProductivityEngine::new(Arc::new(RealStore::open(&db_path).unwrap()));
    let report = engine.build_report(7, period).await.unwrap();
    let calendar = MonthCalendar::new(period).unwrap();

    assert_eq!(report.services().count(), 12);
    for service in report.services() {
        let single = engine
            .daily_series_for_service(7, service.service_id, period)
            .await
            .unwrap();
        assert_eq!(single.len() as u32, calendar.days_in_month());
        assert_eq!(single, service.daily_metrics, "service_id={}", service.service_id);
    }

    let first = report.find_service(7001).unwrap();
    assert!(first.daily_metrics.iter().all(|m| m.executed < 99));
}

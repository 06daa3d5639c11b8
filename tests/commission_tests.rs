use commission::calc::{
    aggregate, calc_row, distribute_equally, equal_share, resize_rows, tier_rate, DistributeError,
    Tier,
};
use commission::data::EmployeeRow;
use commission::session::{RowEdit, Session, TargetBalance};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

#[test]
fn tier_boundaries_are_inclusive() {
    assert_eq!(tier_rate(1.0), 0.02);
    assert_eq!(tier_rate(0.999), 0.01);
    assert_eq!(tier_rate(0.9), 0.01);
    assert_eq!(tier_rate(0.8999), 0.005);
    assert_eq!(tier_rate(0.8), 0.005);
    assert_eq!(tier_rate(0.7999), 0.0);
    assert_eq!(tier_rate(-5.0), 0.0);
    assert_eq!(tier_rate(3.5), 0.02);
}

#[test]
fn tier_is_monotonic_over_a_sweep() {
    let mut previous = tier_rate(-1.0);
    for step in 0..=2_500 {
        let ratio = -1.0 + step as f64 * 0.001;
        let rate = tier_rate(ratio);
        assert!(rate >= previous, "tier dropped at ratio {ratio}");
        previous = rate;
    }
}

#[test]
fn zero_target_row_never_divides() {
    for tier in [Tier::Zero, Tier::HalfPercent, Tier::OnePercent, Tier::TwoPercent] {
        let result = calc_row(0.0, 0.0, tier);
        assert_eq!(result.achievement, 0.0);
        assert_eq!(result.commission, 0.0);
        let expected_rate = if tier.scales_with_personal_achievement() {
            0.0
        } else {
            tier.rate()
        };
        assert_eq!(result.rate, expected_rate);
    }
}

#[test]
fn zero_target_with_sales_yields_zero_achievement() {
    let result = calc_row(50_000.0, 0.0, Tier::TwoPercent);
    assert_eq!(result.achievement, 0.0);
    assert_eq!(result.rate, 0.0);
    assert_eq!(result.commission, 0.0);
}

#[test]
fn two_percent_tier_scales_with_personal_achievement() {
    let result = calc_row(500_000.0, 400_000.0, Tier::TwoPercent);
    approx_eq(result.achievement, 1.25, 1e-12);
    approx_eq(result.rate, 0.025, 1e-12);
    approx_eq(result.commission, 12_500.0, 1e-6);
}

#[test]
fn half_percent_tier_scales_with_personal_achievement() {
    let result = calc_row(80_000.0, 100_000.0, Tier::HalfPercent);
    approx_eq(result.rate, 0.004, 1e-12);
    approx_eq(result.commission, 320.0, 1e-9);
}

#[test]
fn one_percent_tier_is_flat() {
    let result = calc_row(200_000.0, 100_000.0, Tier::OnePercent);
    approx_eq(result.achievement, 2.0, 1e-12);
    assert_eq!(result.rate, 0.01);
    approx_eq(result.commission, 2_000.0, 1e-9);
}

#[test]
fn empty_aggregation_has_zero_averages() {
    let totals = aggregate(Tier::TwoPercent, &[]);
    assert_eq!(totals.avg_achievement, 0.0);
    assert_eq!(totals.avg_rate, 0.0);
    assert_eq!(totals.total_sales, 0.0);
    assert!(totals.rows.is_empty());
}

#[test]
fn aggregation_sums_and_averages_rows_in_order() {
    let rows = vec![
        EmployeeRow::new("A", 500_000.0, 400_000.0),
        EmployeeRow::new("B", 100_000.0, 200_000.0),
        EmployeeRow::new("C", 0.0, 0.0),
    ];
    let totals = aggregate(Tier::TwoPercent, &rows);

    assert_eq!(totals.rows.len(), 3);
    approx_eq(totals.rows[0].achievement, 1.25, 1e-12);
    approx_eq(totals.rows[1].achievement, 0.5, 1e-12);
    assert_eq!(totals.rows[2].achievement, 0.0);

    approx_eq(totals.total_sales, 600_000.0, 1e-9);
    approx_eq(totals.total_targets, 600_000.0, 1e-9);
    approx_eq(totals.total_commission, 12_500.0 + 1_000.0, 1e-6);
    approx_eq(totals.avg_achievement, (1.25 + 0.5) / 3.0, 1e-12);
    approx_eq(totals.avg_rate, (0.025 + 0.01) / 3.0, 1e-12);
}

#[test]
fn aggregation_is_order_independent() {
    let rows = vec![
        EmployeeRow::new("A", 120_000.0, 100_000.0),
        EmployeeRow::new("B", 90_000.0, 100_000.0),
        EmployeeRow::new("C", 30_000.0, 60_000.0),
    ];
    let mut reversed = rows.clone();
    reversed.reverse();

    let forward = aggregate(Tier::HalfPercent, &rows);
    let backward = aggregate(Tier::HalfPercent, &reversed);
    approx_eq(forward.total_commission, backward.total_commission, 1e-9);
    approx_eq(forward.avg_rate, backward.avg_rate, 1e-15);
    assert_eq!(forward.rows[0], backward.rows[2]);
}

#[test]
fn equal_distribution_floors_and_is_uniform() {
    let mut rows = resize_rows(&[], 3);
    rows[1].sales = 42.0;
    let share = distribute_equally(&mut rows, 1_000_000.0, 3).expect("count is positive");

    assert_eq!(share, 333_333.0);
    assert!(rows.iter().all(|row| row.target == 333_333.0));
    assert_eq!(rows[1].sales, 42.0);
    assert_eq!(rows[0].name, "Employee 1");
}

#[test]
fn equal_distribution_with_zero_count_is_reported() {
    let mut rows = vec![EmployeeRow::new("A", 1.0, 7.0)];
    assert_eq!(
        distribute_equally(&mut rows, 1_000_000.0, 0),
        Err(DistributeError::NoEmployees)
    );
    assert_eq!(rows[0].target, 7.0, "rows must be left untouched");
    assert_eq!(equal_share(0.0, 0), Err(DistributeError::NoEmployees));
}

#[test]
fn resize_preserves_existing_rows_by_position() {
    let original = resize_rows(&[], 2);
    let grown = resize_rows(&original, 4);
    assert_eq!(grown.len(), 4);
    assert_eq!(grown[0].id, original[0].id);
    assert_eq!(grown[1].id, original[1].id);
    assert_eq!(grown[2].name, "Employee 3");
    assert_eq!(grown[3].target, 0.0);

    let shrunk = resize_rows(&grown, 1);
    assert_eq!(shrunk.len(), 1);
    assert_eq!(shrunk[0].id, original[0].id);
}

#[test]
fn session_add_employee_prefills_suggested_target() {
    let mut session = Session::default();
    session.set_employee_count(3);
    let added = session.add_employee().clone();
    assert_eq!(added.name, "Employee 4");
    assert_eq!(added.target, 333_333.0);
    assert_eq!(session.rows.len(), 4);

    let mut empty = Session::default();
    assert_eq!(empty.add_employee().target, 0.0);
}

#[test]
fn session_remove_and_update_by_id() {
    let mut session = Session::default();
    session.set_employee_count(2);
    let first_id = session.rows[0].id.clone();
    let second_id = session.rows[1].id.clone();

    assert!(session.update_row(&second_id, RowEdit::Sales(-3.0)));
    assert_eq!(session.rows[1].sales, 0.0);
    assert!(session.update_row(&second_id, RowEdit::Target(f64::NAN)));
    assert_eq!(session.rows[1].target, 0.0);
    assert!(session.update_row(&second_id, RowEdit::Name("Mona".to_string())));
    assert_eq!(session.rows[1].name, "Mona");

    assert!(session.remove_employee(&first_id));
    assert!(!session.remove_employee(&first_id));
    assert!(!session.update_row(&first_id, RowEdit::Sales(1.0)));
    assert_eq!(session.rows.len(), 1);
    assert_eq!(session.rows[0].id, second_id);
}

#[test]
fn session_summary_reports_outlet_diff_and_balance() {
    let mut session = Session {
        outlet_target: 1_000_000.0,
        outlet_achievement_percent: 100.0,
        ..Session::default()
    };
    session.set_employee_count(3);
    session.distribute_equally().expect("count is positive");

    let summary = session.summary();
    assert_eq!(summary.outlet_tier, Tier::TwoPercent);
    assert_eq!(summary.outlet_rate, 0.02);
    assert_eq!(summary.suggested_per_employee, 333_333.0);
    assert_eq!(summary.outlet_diff, -1.0);
    assert_eq!(summary.balance, TargetBalance::Under);

    session.rows[0].target += 1.0;
    let balanced = session.summary();
    assert_eq!(balanced.outlet_diff, 0.0);
    assert_eq!(balanced.balance, TargetBalance::Balanced);
}

#[test]
fn session_recomputation_is_idempotent() {
    let mut session = Session {
        outlet_achievement_percent: 88.0,
        ..Session::default()
    };
    session.set_employee_count(2);
    session.rows[0].sales = 90_000.0;
    session.rows[0].target = 100_000.0;
    assert_eq!(session.summary(), session.summary());
}

#[test]
fn distribute_to_count_syncs_rows_with_count() {
    let mut session = Session::default();
    session.set_employee_count(5);
    let kept_id = session.rows[2].id.clone();
    session.suggest_count = 3;

    let share = session.distribute_to_count().expect("count is positive");
    assert_eq!(share, 333_333.0);
    assert_eq!(session.rows.len(), 3);
    assert_eq!(session.rows[2].id, kept_id);
    assert_eq!(session.summary().outlet_diff, -1.0);
}

#[test]
fn distribute_to_count_with_zero_count_leaves_rows_alone() {
    let mut session = Session::default();
    session.rows.push(EmployeeRow::new("A", 1.0, 7.0));
    assert_eq!(session.distribute_to_count(), Err(DistributeError::NoEmployees));
    assert_eq!(session.rows.len(), 1);
    assert_eq!(session.rows[0].target, 7.0);
}

//! Full-pipeline scenarios (spec §8's "concrete end-to-end scenarios"),
//! driven entirely through [`drawpath::facade::PathSystem`] rather than any
//! one stage in isolation — the one place a cross-crate/full-pipeline check
//! belongs, per the teacher's convention of keeping single-stage golden
//! tests inline and reserving `tests/` for whole-pipeline checks.

use drawpath::coord::ViewBox;
use drawpath::facade::PathSystem;

fn system() -> PathSystem {
    PathSystem::new().configure_viewport(
        800.0,
        600.0,
        Some(ViewBox {
            min_x: 0.0,
            min_y: 0.0,
            width: 400.0,
            height: 300.0,
        }),
        96.0,
    )
}

#[test]
fn scenario_1_line_closes_and_normalizes_to_span() {
    let result = system().process_path("M 100 150 L 300 150 Z", None).unwrap();
    assert!(result.path_xml.contains("a:moveTo"));
    assert!(result.path_xml.contains("a:lnTo"));
    assert!(result.path_xml.contains("a:close"));
    assert!(result.path_xml.contains(r#"x="0""#));
    assert!(result.path_xml.contains(r#"x="100000""#));
    assert_eq!(result.stats.command_count, 3);
}

#[test]
fn scenario_2_cubic_has_three_points_and_spans_full_range() {
    let result = system()
        .process_path("M 100 100 C 100 50 200 50 200 100", None)
        .unwrap();
    assert_eq!(result.path_xml.matches("a:cubicBezTo").count(), 1);
    assert_eq!(result.path_xml.matches("a:pt").count(), 1 + 3); // moveTo's pt + cubic's 3
    assert!(result.path_xml.contains(r#"x="0""#));
    assert!(result.path_xml.contains(r#"x="100000""#));
}

#[test]
fn scenario_3_arc_expands_to_at_least_one_cubic() {
    let result = system()
        .process_path("M 50 100 A 50 50 0 0 1 150 100", None)
        .unwrap();
    assert!(result.path_xml.contains("a:moveTo"));
    assert!(result.path_xml.matches("a:cubicBezTo").count() >= 1);
    assert_eq!(result.stats.arc_count, 1);
}

#[test]
fn scenario_4_horizontal_and_vertical_become_line_tos() {
    let result = system().process_path("M 0 0 h 100 v 100 h -100 Z", None).unwrap();
    assert_eq!(result.path_xml.matches("a:lnTo").count(), 3);
    assert!(result.path_xml.contains("a:close"));
}

#[test]
fn scenario_5_quadratic_and_smooth_quad_lift_to_two_cubics() {
    let result = system()
        .process_path("M 10 80 Q 95 10 180 80 T 350 80", None)
        .unwrap();
    assert_eq!(result.path_xml.matches("a:cubicBezTo").count(), 2);
}

#[test]
fn scenario_6_smooth_cubic_reflects_about_the_pen() {
    let result = system()
        .process_path("M 0 0 C 0 50 50 50 50 0 S 100 -50 100 0", None)
        .unwrap();
    assert_eq!(result.path_xml.matches("a:cubicBezTo").count(), 2);
}

#[test]
fn shape_envelope_wraps_path_in_sp_with_fill_and_xfrm() {
    use drawpath::style::Style;

    let style = Style::new().with_fill("#336699");
    let result = system()
        .process_path("M 0 0 L 100 0 L 100 100 Z", Some(&style))
        .unwrap();
    let shape_xml = result.shape_xml.unwrap();
    assert!(shape_xml.contains("p:sp"));
    assert!(shape_xml.contains("a:custGeom"));
    assert!(shape_xml.contains("a:xfrm"));
    assert!(shape_xml.contains("336699"));
}

#[test]
fn empty_path_data_yields_empty_commands_and_empty_path_list() {
    let result = system().process_path("", None).unwrap();
    assert!(result.commands.is_empty());
    assert!(!result.path_xml.contains("a:moveTo"));
    assert_eq!(result.stats.command_count, 0);
}

#[test]
fn path_not_starting_with_move_to_is_rejected() {
    let result = system().process_path("L 10 10", None);
    assert!(result.is_err());
}

mod support;

use altcut::{
    CutError, CutProgress, CutSettings, CutState, Direction, GeometryKernel, RepeatedCut,
    RepeatedCutParams, altitude_plan,
    cut::{partition_into_bands_with, whole_solid_count},
    cut_repeatedly, partition_into_bands,
    units::Length,
};
use nalgebra::{Matrix4, Vector3};

use crate::support::{ScriptedKernel, approx_eq, document_with_box, edge_heights, forms_closed_loops};

#[test]
fn ten_metre_solid_base_to_top() {
    let (mut doc, solid) = document_with_box(4000.0, 4000.0, 10000.0);

    let report = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(2.0),
        5,
        Direction::BaseToTop,
        false,
        false,
    )
    .unwrap();

    let altitudes: Vec<_> = report.cuts.iter().map(|c| c.altitude.value).collect();
    assert_eq!(altitudes, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
    assert!(report.cuts.iter().all(|c| !c.edges.is_empty()));
    assert!(report.skipped.is_empty());

    let group = report.group.expect("cut lines group");
    assert_eq!(doc.group_name(group).unwrap(), "Cut lines (2 m, Base to top)");
    assert_eq!(doc.edges(group).unwrap().len(), 20);
    assert_eq!(report.edges.len(), 20);
    assert!(forms_closed_loops(&doc, &report.edges));
    assert!(!doc.is_hidden(group).unwrap());
    assert!(report.edges.iter().all(|&e| !doc.is_hidden(e).unwrap()));
    // the group sits beside the solid
    assert_eq!(doc.parent(group).unwrap(), doc.parent(solid).unwrap());
}

#[test]
fn hide_lines_hides_edges_and_group() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 6000.0);
    let report = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(1.5),
        3,
        Direction::BaseToTop,
        true,
        false,
    )
    .unwrap();
    let group = report.group.unwrap();
    assert!(doc.is_hidden(group).unwrap());
    assert!(report.edges.iter().all(|&e| doc.is_hidden(e).unwrap()));
}

#[test]
fn cut_whole_solid_ignores_the_count() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);
    let report = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(3.0),
        99,
        Direction::BaseToTop,
        false,
        true,
    )
    .unwrap();
    let altitudes: Vec<_> = report.cuts.iter().map(|c| c.altitude.value).collect();
    assert_eq!(altitudes, vec![3.0, 6.0, 9.0]);
}

#[test]
fn whole_solid_count_never_uses_a_leftover_band() {
    assert_eq!(whole_solid_count(10.0, 3.0), 3);
    assert_eq!(whole_solid_count(10.0, 2.0), 5);
    assert_eq!(whole_solid_count(0.3, 0.1), 3);
    assert_eq!(whole_solid_count(1.0, 2.0), 0);
    assert_eq!(whole_solid_count(1.0, 0.0), 0);
}

#[test]
fn top_to_base_on_the_whole_solid_skips_the_base_itself() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);
    let report = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(2.0),
        0,
        Direction::TopToBase,
        false,
        true,
    )
    .unwrap();
    let altitudes: Vec<_> = report.cuts.iter().map(|c| c.altitude.value).collect();
    assert_eq!(altitudes, vec![8.0, 6.0, 4.0, 2.0]);
    assert_eq!(report.skipped, vec![Length::meters(0.0)]);
}

#[test]
fn top_to_base_count_reaching_the_base_fails() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);
    let before = doc.entities().clone();
    let err = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(2.0),
        5,
        Direction::TopToBase,
        false,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, CutError::GeometryOperationFailed(_)), "{err:?}");
    assert_eq!(doc.entities(), &before);
}

#[test]
fn count_past_the_top_fails_before_committing_anything() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);
    let before = doc.entities().clone();
    let mut repeated = RepeatedCut::new(
        RepeatedCutParams::default()
            .with_spacing(Length::meters(2.0))
            .with_count(8),
    );
    let err = repeated.run(&mut doc, solid).unwrap_err();

    assert!(matches!(err, CutError::GeometryOperationFailed(_)), "{err:?}");
    assert_eq!(repeated.state(), CutState::Aborted);
    assert_eq!(doc.entities(), &before);
    assert!(doc.operation_name().is_none());
    assert_eq!(doc.groups(None), vec![solid]);
}

#[test]
fn huge_counts_are_capped_by_the_height() {
    let plan = altitude_plan(10.0, 2.0, usize::MAX, Direction::BaseToTop, false);
    assert_eq!(plan, vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);

    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);
    let err = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(2.0),
        usize::MAX,
        Direction::BaseToTop,
        false,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, CutError::GeometryOperationFailed(_)), "{err:?}");
}

#[test]
fn base_and_top_plans_mirror_around_half_height() {
    let height = 10.0;
    let up = altitude_plan(height, 2.0, 4, Direction::BaseToTop, false);
    let down = altitude_plan(height, 2.0, 4, Direction::TopToBase, false);
    for (a, b) in up.iter().zip(&down) {
        assert!(approx_eq(a + b, height, 1e-12));
    }
}

#[test]
fn middle_directions_start_at_half_height() {
    assert_eq!(
        altitude_plan(10.0, 2.0, 3, Direction::MiddleToBase, false),
        vec![5.0, 3.0, 1.0]
    );
    assert_eq!(
        altitude_plan(10.0, 2.0, 3, Direction::MiddleToTop, false),
        vec![5.0, 7.0, 9.0]
    );
}

#[test]
fn middle_to_top_on_the_whole_solid_fails_above_the_top() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);
    let before = doc.entities().clone();
    let mut repeated = RepeatedCut::new(
        RepeatedCutParams::default()
            .with_spacing(Length::meters(2.0))
            .with_direction(Direction::MiddleToTop)
            .with_cut_whole_solid(true),
    );
    let err = repeated.run(&mut doc, solid).unwrap_err();

    assert!(matches!(err, CutError::GeometryOperationFailed(_)), "{err:?}");
    assert_eq!(repeated.state(), CutState::Aborted);
    assert_eq!(doc.entities(), &before);
}

#[test]
fn failure_in_the_third_cut_restores_the_solid_exactly() {
    let (doc, solid) = document_with_box(3000.0, 3000.0, 10000.0);
    let before = doc.entities().clone();
    let bounds_before = doc.bounds(solid).unwrap();
    let mut kernel = ScriptedKernel::new(doc).failing_intersect_at(3);

    let mut repeated = RepeatedCut::new(
        RepeatedCutParams::default()
            .with_spacing(Length::meters(2.0))
            .with_count(5),
    );
    let err = repeated.run(&mut kernel, solid).unwrap_err();

    assert!(matches!(err, CutError::TransactionAborted { .. }), "{err:?}");
    assert_eq!(repeated.state(), CutState::Aborted);
    assert_eq!(kernel.intersect_calls, 3);
    assert_eq!(kernel.doc.entities(), &before);
    assert_eq!(kernel.doc.bounds(solid).unwrap(), bounds_before);
    assert_eq!(kernel.doc.edges(solid).unwrap().len(), 12);
}

#[test]
fn progress_is_reported_at_every_cut() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 8000.0);
    let mut events: Vec<CutProgress> = Vec::new();
    {
        let mut repeated = RepeatedCut::new(
            RepeatedCutParams::default()
                .with_spacing(Length::meters(2.0))
                .with_count(3),
        )
        .on_progress(|p| events.push(*p));
        repeated.run(&mut doc, solid).unwrap();
        assert_eq!(repeated.state(), CutState::Committed);
    }
    let indices: Vec<_> = events.iter().map(|p| (p.index, p.count)).collect();
    assert_eq!(indices, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(events[2].altitude, Length::meters(6.0));
}

#[test]
fn a_repeated_cut_runs_once() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 4000.0);
    let mut repeated = RepeatedCut::new(RepeatedCutParams::default());
    repeated.run(&mut doc, solid).unwrap();
    let err = repeated.run(&mut doc, solid).unwrap_err();
    assert!(matches!(err, CutError::InvalidArgument(_)));
}

#[test]
fn invalid_spacing_is_rejected_up_front() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 4000.0);
    let before = doc.entities().clone();
    for spacing in [0.0, -1.0] {
        let err = cut_repeatedly(
            &mut doc,
            solid,
            Length::meters(spacing),
            3,
            Direction::BaseToTop,
            false,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CutError::InvalidArgument(_)));
    }
    assert_eq!(doc.entities(), &before);
}

#[test]
fn zero_cuts_is_a_no_op() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 4000.0);
    let before = doc.entities().clone();
    let report = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(1.0),
        0,
        Direction::BaseToTop,
        false,
        false,
    )
    .unwrap();
    assert!(report.cuts.is_empty());
    assert!(report.group.is_none());
    assert_eq!(doc.entities(), &before);
}

#[test]
fn cut_lines_follow_a_moved_solid() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 6000.0);
    let offset = Matrix4::new_translation(&Vector3::new(500.0, 500.0, 2000.0));
    doc.transform_entity(solid, &offset).unwrap();

    let report = cut_repeatedly(
        &mut doc,
        solid,
        Length::meters(2.0),
        2,
        Direction::BaseToTop,
        false,
        false,
    )
    .unwrap();

    let group = report.group.unwrap();
    assert_eq!(doc.transformation(group).unwrap(), offset);
    let mut heights = edge_heights(&doc, &report.edges);
    heights.sort_by(f64::total_cmp);
    heights.dedup_by(|a, b| approx_eq(*a, *b, 1e-6));
    assert_eq!(heights.len(), 2);
    assert!(approx_eq(heights[0], 2000.0, 1e-6));
    assert!(approx_eq(heights[1], 4000.0, 1e-6));
    let world = doc.bounds(group).unwrap();
    assert!(approx_eq(world.min().z, 4000.0, 1e-6));
    assert!(approx_eq(world.max().z, 6000.0, 1e-6));
}

#[test]
fn partition_replaces_the_solid_by_bands() {
    let (mut doc, solid) = document_with_box(2000.0, 2000.0, 10000.0);

    let report = RepeatedCut::new(
        RepeatedCutParams::default()
            .with_spacing(Length::meters(2.0))
            .with_count(4)
            .with_partition_bands(true),
    )
    .run(&mut doc, solid)
    .unwrap();

    assert!(!doc.is_valid(solid));
    assert_eq!(report.bands.len(), 5);
    for (n, &band) in report.bands.iter().enumerate() {
        assert_eq!(doc.group_name(band).unwrap(), format!("Band {}", n + 1));
        assert!(doc.is_closed_volume(band).unwrap());
        let b = doc.bounds(band).unwrap();
        assert!(approx_eq(b.min().z, 2000.0 * n as f64, 1e-6));
        assert!(approx_eq(b.height(), 2000.0, 1e-6));
        assert!(approx_eq(b.width(), 2000.0, 1e-6));
    }
    // the cut lines outlive the solid
    assert!(doc.is_valid(report.group.unwrap()));
}

#[test]
fn partition_at_one_altitude_gives_two_bands() {
    let (mut doc, solid) = document_with_box(1000.0, 1000.0, 6000.0);
    let bands = partition_into_bands(&mut doc, solid, &[Length::meters(4.0)]).unwrap();

    assert_eq!(bands.len(), 2);
    assert!(!doc.is_valid(solid));
    let heights: Vec<_> = bands.iter().map(|&b| doc.bounds(b).unwrap().height()).collect();
    assert!(approx_eq(heights[0], 4000.0, 1e-6));
    assert!(approx_eq(heights[1], 2000.0, 1e-6));
    assert!(doc.operation_name().is_none());
}

#[test]
fn partition_ignores_levels_outside_the_solid() {
    let (mut doc, solid) = document_with_box(1000.0, 1000.0, 6000.0);
    let before = doc.entities().clone();
    let bands = partition_into_bands(
        &mut doc,
        solid,
        &[Length::meters(0.0), Length::meters(6.0), Length::meters(9.0)],
    )
    .unwrap();
    assert!(bands.is_empty());
    assert_eq!(doc.entities(), &before);
}

#[test]
fn band_names_follow_the_settings() {
    let (mut doc, solid) = document_with_box(1000.0, 1000.0, 3000.0);
    let settings = CutSettings::default().with_band_name("Floor");
    let bands = partition_into_bands_with(
        &mut doc,
        solid,
        &[Length::meters(2.0), Length::meters(1.0)],
        &settings,
    )
    .unwrap();
    let names: Vec<_> = bands.iter().map(|&b| doc.group_name(b).unwrap()).collect();
    assert_eq!(names, vec!["Floor 1", "Floor 2", "Floor 3"]);
}

#[test]
fn custom_names_reach_the_cut_lines_group() {
    let (mut doc, solid) = document_with_box(1000.0, 1000.0, 3000.0);
    let report = RepeatedCut::new(
        RepeatedCutParams::default()
            .with_spacing(Length::millimeters(1000.0))
            .with_count(2),
    )
    .with_settings(CutSettings::default().with_cut_lines_name("Contours"))
    .run(&mut doc, solid)
    .unwrap();
    assert_eq!(
        doc.group_name(report.group.unwrap()).unwrap(),
        "Contours (1000 mm, Base to top)"
    );
    let altitudes: Vec<_> = report.cuts.iter().map(|c| c.altitude).collect();
    assert_eq!(
        altitudes,
        vec![Length::millimeters(1000.0), Length::millimeters(2000.0)]
    );
}

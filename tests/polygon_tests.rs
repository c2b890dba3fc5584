mod support;

use altcut::mesh::polygon::Polygon;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::support::approx_eq;

fn l_shape() -> Polygon {
    Polygon::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.0),
        Point3::new(4.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(1.0, 3.0, 0.0),
        Point3::new(0.0, 3.0, 0.0),
    ])
    .unwrap()
}

fn square() -> Polygon {
    Polygon::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ])
    .unwrap()
}

#[test]
fn degenerate_rings_are_rejected() {
    assert!(Polygon::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]).is_none());
    let p = Point3::new(1.0, 1.0, 1.0);
    assert!(Polygon::new(vec![p, p, p, p]).is_none());
}

#[test]
fn area_and_bounding_box() {
    let poly = l_shape();
    assert!(approx_eq(poly.area(), 6.0, 1e-12));
    let bb = poly.bounding_box();
    assert_eq!(bb.min(), Point3::origin());
    assert_eq!(bb.max(), Point3::new(4.0, 3.0, 0.0));
}

#[test]
fn flip() {
    let mut poly = square();
    poly.flip();
    assert_eq!(poly.vertices[0], Point3::new(0.0, 1.0, 0.0));
    assert!((poly.plane.normal() + Vector3::z()).norm() < 1e-12);
}

#[test]
fn edges_close_the_ring() {
    let poly = square();
    let edges: Vec<_> = poly.edges().collect();
    assert_eq!(edges.len(), 4);
    assert_eq!(edges[3], (Point3::new(0.0, 1.0, 0.0), Point3::origin()));
}

#[test]
fn convexity() {
    assert!(square().is_convex());
    assert!(!l_shape().is_convex());
}

#[test]
fn convex_parts_cover_a_concave_ring() {
    let poly = l_shape();
    let parts = poly.convex_parts();
    assert!(parts.len() >= 4);
    let total: f64 = parts.iter().map(Polygon::area).sum();
    assert!(approx_eq(total, poly.area(), 1e-9));
    for part in &parts {
        assert!(part.is_convex());
        assert!((part.plane.normal() - poly.plane.normal()).norm() < 1e-12);
        assert!(part.max_plane_deviation().1 < 1e-9);
    }
    // already convex: returned as is
    assert_eq!(square().convex_parts(), vec![square()]);
}

#[test]
fn line_interval_clips_to_the_polygon() {
    let poly = square();
    let (t0, t1) = poly
        .line_interval(&Point3::new(0.5, 0.5, 0.0), &Vector3::x())
        .unwrap();
    assert!(approx_eq(t0, -0.5, 1e-12));
    assert!(approx_eq(t1, 0.5, 1e-12));

    // a line running along an edge still yields the edge
    let (t0, t1) = poly
        .line_interval(&Point3::new(3.0, 1.0, 0.0), &Vector3::x())
        .unwrap();
    assert!(approx_eq(t0, -3.0, 1e-12));
    assert!(approx_eq(t1, -2.0, 1e-12));

    assert!(
        poly.line_interval(&Point3::new(0.5, 2.0, 0.0), &Vector3::x())
            .is_none()
    );
}

#[test]
fn transform_rederives_the_plane() {
    let poly = square();
    let rotated = poly.transform(&Matrix4::new_rotation(Vector3::new(
        std::f64::consts::FRAC_PI_2,
        0.0,
        0.0,
    )));
    // +Z rotated a quarter turn about X points along -Y
    assert!((rotated.plane.normal() + Vector3::y()).norm() < 1e-9);

    let lifted = poly.translate(Vector3::new(0.0, 0.0, 7.0));
    assert!(approx_eq(lifted.plane.offset(), 7.0, 1e-12));
    assert!(approx_eq(lifted.bounding_box().min().z, 7.0, 1e-12));
}

#[test]
fn plane_deviation_spots_warped_rings() {
    let warped = Polygon::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.2),
        Point3::new(0.0, 1.0, 0.0),
    ])
    .unwrap();
    let (_, deviation) = warped.max_plane_deviation();
    assert!(deviation > 0.01);
    assert!(square().max_plane_deviation().1 < 1e-12);
}

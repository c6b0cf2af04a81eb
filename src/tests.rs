//! Scenario tests for light propagation

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use glam::DVec2;

use crate::{
    CastMode, DEPTH_LIMIT, FilterLine, LightTree, Obstacle, ObstacleId, Primitive, RayColor, ReflectLine,
    RenderTarget, SolidCircle, SolidLine, SolidRect,
};

const TOL: f64 = 1e-9;

fn close(a: DVec2, b: DVec2) -> bool {
    (a - b).length() < 1e-6
}

/// Light at the origin facing +x.
fn torch(fov_degrees: f64, color: RayColor) -> LightTree {
    LightTree::new(DVec2::ZERO, 0.0, fov_degrees * PI / 180.0, color)
}

fn at_depth(tree: &LightTree, depth: usize) -> Vec<&crate::Sector> {
    tree.sectors().map(|(_, s)| s).filter(|s| s.depth == depth).collect()
}

#[derive(Default)]
struct Recorder {
    lights: Vec<usize>,
    outlines: Vec<usize>,
}

impl RenderTarget for Recorder {
    fn submit(&mut self, primitive: Primitive, verts: &[DVec2]) {
        match primitive {
            Primitive::Light { .. } => self.lights.push(verts.len()),
            _ => self.outlines.push(verts.len()),
        }
    }
}

#[test]
fn test_main() {
    crate::main();
}

#[test]
fn test_empty_scene_one_sector_per_quarter_turn() {
    for (fov, wedges) in [(45.0, 1), (90.0, 1), (180.0, 2), (360.0, 4)] {
        let mut tree = torch(fov, RayColor::WHITE);
        tree.cast(&[]);

        assert_eq!(at_depth(&tree, 1).len(), wedges, "fov {fov}");
        assert_eq!(tree.len(), wedges + 1);
        assert!(tree.sectors().all(|(_, s)| s.incident.is_none()));
    }
}

#[test]
fn test_opaque_wall_ends_the_light() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![Box::new(SolidLine::from_coords(5.0, -5.0, 5.0, 5.0))];
    let mut tree = torch(90.0, RayColor::WHITE);
    tree.cast(&obstacles);

    let lit = at_depth(&tree, 1);
    assert_eq!(lit.len(), 1);
    let sector = lit[0];

    assert!((sector.proj_left - 50f64.sqrt()).abs() < TOL);
    assert!((sector.proj_right - 50f64.sqrt()).abs() < TOL);
    assert!(close(sector.origin + sector.field_left * sector.proj_left, DVec2::new(5.0, -5.0)));
    assert!(close(sector.origin + sector.field_right * sector.proj_right, DVec2::new(5.0, 5.0)));
    assert_eq!(sector.incident, Some(ObstacleId(0)));

    assert!(at_depth(&tree, 2).is_empty());
}

#[test]
fn test_mirror_reflects_once() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![Box::new(ReflectLine::with_filter(
        DVec2::new(5.0, -5.0),
        DVec2::new(5.0, 5.0),
        RayColor::WHITE,
    ))];
    let mut tree = torch(90.0, RayColor::WHITE);
    tree.cast(&obstacles);

    let reflected = at_depth(&tree, 2);
    assert_eq!(reflected.len(), 1);
    let sector = reflected[0];

    assert!(close(sector.origin, DVec2::new(10.0, 0.0)));
    assert!(close(sector.field_left, DVec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2)));
    assert!(close(sector.field_right, DVec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2)));
    assert!((sector.clip_left - 50f64.sqrt()).abs() < 1e-6);
    assert!((sector.clip_right - 50f64.sqrt()).abs() < 1e-6);
    assert_eq!(sector.color, RayColor::WHITE);
    assert_eq!(sector.source, Some(ObstacleId(0)));
    assert!(sector.incident.is_none());

    // Quad from the mirror out to the default range
    assert_eq!(sector.verts().len(), 6);
    assert!(at_depth(&tree, 3).is_empty());
}

#[test]
fn test_matching_filter_is_transparent() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![
        Box::new(FilterLine::with_filter(DVec2::new(5.0, -20.0), DVec2::new(5.0, 20.0), RayColor::RED)),
        Box::new(SolidLine::from_coords(10.0, -20.0, 10.0, 20.0)),
    ];
    let mut tree = torch(90.0, RayColor::RED);
    tree.cast(&obstacles);

    let lit = at_depth(&tree, 1);
    assert_eq!(lit.len(), 1);
    assert_eq!(lit[0].incident, Some(ObstacleId(1)));
    assert!((lit[0].proj_left - 200f64.sqrt()).abs() < 1e-6);
    assert!(at_depth(&tree, 2).is_empty());
}

#[test]
fn test_filter_tints_light_passing_through() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![
        Box::new(SolidLine::from_coords(10.0, -20.0, 10.0, 20.0)),
        Box::new(FilterLine::with_filter(
            DVec2::new(5.0, -20.0),
            DVec2::new(5.0, 20.0),
            RayColor::GREEN | RayColor::INVERSE,
        )),
    ];
    let mut tree = torch(90.0, RayColor::WHITE);
    tree.cast(&obstacles);

    let lit = at_depth(&tree, 1);
    assert_eq!(lit.len(), 1);
    assert_eq!(lit[0].incident, Some(ObstacleId(1)));
    assert_eq!(lit[0].color, RayColor::WHITE);

    let tinted = at_depth(&tree, 2);
    assert_eq!(tinted.len(), 1);
    assert_eq!(tinted[0].color, RayColor::GREEN);
    assert_eq!(tinted[0].source, Some(ObstacleId(1)));
    assert_eq!(tinted[0].incident, Some(ObstacleId(0)));
    assert!((tinted[0].clip_left - 50f64.sqrt()).abs() < 1e-6);
    assert!((tinted[0].proj_left - 200f64.sqrt()).abs() < 1e-6);
}

#[test]
fn test_absorbed_light_is_dropped() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![Box::new(ReflectLine::with_filter(
        DVec2::new(5.0, -5.0),
        DVec2::new(5.0, 5.0),
        RayColor::BLUE,
    ))];
    let mut tree = torch(90.0, RayColor::RED);
    tree.cast(&obstacles);

    assert_eq!(at_depth(&tree, 1)[0].incident, Some(ObstacleId(0)));
    assert!(at_depth(&tree, 2).is_empty());
}

#[test]
fn test_circle_shadow() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![Box::new(SolidCircle::new(DVec2::new(20.0, 0.0), 5.0))];
    let mut tree = torch(90.0, RayColor::WHITE);
    tree.cast(&obstacles);

    let shadowed: Vec<_> = tree.sectors().filter(|(_, s)| s.incident == Some(ObstacleId(0))).collect();
    assert_eq!(shadowed.len(), 1);
    let (_, sector) = shadowed[0];

    // Ends at the tangent points
    let tangent = 375f64.sqrt();
    assert!((sector.proj_left - tangent).abs() < 1e-6);
    assert!((sector.proj_right - tangent).abs() < 1e-6);

    // Light either side of the disc carries on
    assert_eq!(at_depth(&tree, 2).len(), 2);
    for side in at_depth(&tree, 2) {
        assert!(side.incident.is_none());
    }
}

#[test]
fn test_light_inside_box_is_not_blocked_by_it() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![Box::new(SolidRect::from_size(-10.0, -10.0, 20.0, 20.0))];
    let mut tree = torch(90.0, RayColor::WHITE);
    tree.cast(&obstacles);

    assert_eq!(tree.len(), 2);
    assert!(at_depth(&tree, 1)[0].incident.is_none());
}

#[test]
fn test_depth_is_capped_between_facing_mirrors() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![
        Box::new(ReflectLine::from_coords(1.0, -5000.0, 1.0, 5000.0)),
        Box::new(ReflectLine::from_coords(-1.0, 5000.0, -1.0, -5000.0)),
    ];
    let mut tree = torch(90.0, RayColor::WHITE);
    tree.cast(&obstacles);

    assert_eq!(tree.max_depth(), DEPTH_LIMIT);
    assert!(tree.sectors().all(|(_, s)| s.depth <= DEPTH_LIMIT));

    // Sectors at the limit are never drawn
    let mut recorder = Recorder::default();
    tree.render(&mut recorder);
    assert_eq!(recorder.lights.len(), DEPTH_LIMIT - 1);
}

#[test]
fn test_parallel_cast_matches_sequential() {
    let obstacles: Vec<Box<dyn Obstacle>> = vec![
        Box::new(SolidLine::from_coords(40.0, -30.0, 45.0, 30.0)),
        Box::new(ReflectLine::from_coords(-30.0, -40.0, -35.0, 40.0)),
        Box::new(ReflectLine::from_coords(-20.0, 60.0, 30.0, 70.0)),
        Box::new(FilterLine::with_filter(DVec2::new(-20.0, -50.0), DVec2::new(20.0, -45.0), RayColor::BLUE)),
        Box::new(SolidCircle::new(DVec2::new(15.0, 15.0), 6.0)),
        Box::new(SolidRect::from_size(-15.0, 20.0, 8.0, 8.0)),
    ];

    let mut sequential = torch(360.0, RayColor::WHITE);
    sequential.cast(&obstacles);

    let mut parallel = torch(360.0, RayColor::WHITE).with_mode(CastMode::Parallel);
    parallel.cast(&obstacles);

    assert!(sequential.len() > 10);
    assert_eq!(sequential.len(), parallel.len());

    for ((id, a), (_, b)) in sequential.sectors().zip(parallel.sectors()) {
        assert_eq!(a.origin, b.origin, "sector {id:?}");
        assert_eq!((a.field_left, a.field_right), (b.field_left, b.field_right));
        assert_eq!((a.clip_left, a.clip_right), (b.clip_left, b.clip_right));
        assert_eq!((a.proj_left, a.proj_right), (b.proj_left, b.proj_right));
        assert_eq!((a.depth, a.color), (b.depth, b.color));
        assert_eq!((a.source, a.incident), (b.source, b.incident));
        assert_eq!((a.parent, &a.children), (b.parent, &b.children));
        assert_eq!(a.verts(), b.verts());
    }
}

#[test]
fn test_render_submits_every_lit_sector() {
    let mut tree = torch(360.0, RayColor::WHITE);
    tree.cast(&[]);

    let mut recorder = Recorder::default();
    tree.render(&mut recorder);
    tree.render_outlines(&mut recorder);

    assert_eq!(recorder.lights, vec![3; 4]);
    assert_eq!(recorder.outlines, vec![6; 4]);

    let wall = SolidRect::from_size(0.0, 0.0, 4.0, 4.0);
    wall.render(&mut recorder);
    assert_eq!(recorder.outlines.last(), Some(&8));
}

#[test]
fn test_demo_scene_snapshot() {
    let obstacles = crate::demo_scene();
    let mut tree = crate::demo_torch(CastMode::Sequential);
    tree.cast(&obstacles);

    assert!(tree.max_depth() <= DEPTH_LIMIT);
    assert!(tree.sectors().any(|(_, s)| s.incident.is_some()));

    let mut canvas = crate::Canvas::new(800, 600);
    tree.render(&mut canvas);

    let near = canvas.pixel(210, 300);
    assert!(near.r > 0.5 && near.g > 0.5 && near.b > 0.5);
}

//! Convex polygons for hitboxes and tile collision shapes.
//!
//! Vertices are stored relative to a translation offset so a shape can be
//! built once and moved every frame with [`Polygon::set_position`].

use glam::Vec2;

/// 2D point / vector. Add, subtract, scale, `length` and `distance` come from glam.
pub type Point = Vec2;

/// A convex polygon. One- and two-vertex polygons are allowed (points and
/// segments) and take part in intersection tests like any other shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    position: Vec2,
    rectangle: bool,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned rectangle from its top-left and bottom-right corners.
    pub fn rectangle(top_left: Vec2, bottom_right: Vec2) -> Self {
        let mut polygon = Self::new();
        polygon.set_rectangle(top_left, bottom_right);
        polygon
    }

    /// Build from vertices given in local space.
    pub fn from_vertices(vertices: impl IntoIterator<Item = Vec2>) -> Self {
        let mut polygon = Self::new();
        for vertex in vertices {
            polygon.add_vertex(vertex);
        }
        polygon
    }

    /// Append a vertex. The shape stops counting as a rectangle even if the
    /// vertices happen to form one; only [`Polygon::set_rectangle`] sets it.
    pub fn add_vertex(&mut self, vertex: Vec2) {
        self.vertices.push(vertex);
        self.rectangle = false;
    }

    /// Replace the shape with the 4 corners of an axis-aligned rectangle.
    /// The translation offset is left untouched.
    pub fn set_rectangle(&mut self, top_left: Vec2, bottom_right: Vec2) {
        self.vertices.clear();
        self.vertices.extend([
            top_left,
            Vec2::new(bottom_right.x, top_left.y),
            bottom_right,
            Vec2::new(top_left.x, bottom_right.y),
        ]);
        self.rectangle = true;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Copy of this shape translated to `position`.
    pub fn at(&self, position: Vec2) -> Polygon {
        Polygon {
            vertices: self.vertices.clone(),
            position,
            rectangle: self.rectangle,
        }
    }

    /// Copy of this shape moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Polygon {
        self.at(self.position + delta)
    }

    pub fn is_rectangle(&self) -> bool {
        self.rectangle
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// World-space vertex `index`.
    pub fn vertex(&self, index: usize) -> Option<Vec2> {
        self.vertices.get(index).map(|v| *v + self.position)
    }

    /// World-space vertices in order.
    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |v| *v + self.position)
    }

    /// World-space bounding box as (min, max).
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut vertices = self.vertices();
        let first = vertices.next()?;
        Some(vertices.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
    }

    /// Separating-axis overlap test.
    ///
    /// Candidate axes are the edge normals of both shapes; a segment
    /// contributes its single normal and a point contributes none. Shapes that
    /// only touch along an edge or at a corner do not intersect.
    pub fn intersects(&self, other: &Polygon) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        let a: Vec<Vec2> = self.vertices().collect();
        let b: Vec<Vec2> = other.vertices().collect();

        let mut tested = false;
        for axis in edge_normals(&a).chain(edge_normals(&b)) {
            tested = true;
            let (min_a, max_a) = project(&a, axis);
            let (min_b, max_b) = project(&b, axis);
            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
        tested
    }
}

fn edge_normals(vertices: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let edges = match vertices.len() {
        0 | 1 => 0,
        2 => 1,
        n => n,
    };
    (0..edges).filter_map(move |i| {
        let edge = vertices[(i + 1) % vertices.len()] - vertices[i];
        if edge == Vec2::ZERO {
            None
        } else {
            Some(edge.perp())
        }
    })
}

fn project(vertices: &[Vec2], axis: Vec2) -> (f32, f32) {
    vertices.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), v| {
        let d = v.dot(axis);
        (min.min(d), max.max(d))
    })
}

//! Path storage
//!
//! Straight-line paths in floating point pixel coordinates. Coordinates are
//! converted to 24.8 fixed point when the path is added to a rasterizer.

pub trait VertexSource {
    fn vertices(&self) -> &[Vertex];
}

#[derive(Debug,Copy,Clone,PartialEq)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    Close,
}
impl Default for PathCommand {
    fn default() -> PathCommand {
        PathCommand::MoveTo
    }
}

#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub cmd: PathCommand
}

impl Vertex {
    pub fn new(x: f64, y: f64, cmd: PathCommand) -> Self {
        Self { x, y, cmd }
    }
    pub fn move_to(x: f64, y: f64) -> Self {
        Self { x, y, cmd: PathCommand::MoveTo }
    }
    pub fn line_to(x: f64, y: f64) -> Self {
        Self { x, y, cmd: PathCommand::LineTo }
    }
    pub fn close_polygon(x: f64, y: f64) -> Self {
        Self { x, y, cmd: PathCommand::Close }
    }
}

#[derive(Debug,Default,Clone)]
pub struct Path {
    pub vertices: Vec<Vertex>,
}

impl VertexSource for Path {
    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl Path {
    pub fn new() -> Self {
        Self { vertices: vec![] }
    }
    /// Closed polygon through `points`
    ///
    ///     use panel_raster::{Path, PathCommand};
    ///     let p = Path::polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
    ///     assert_eq!(p.vertices.len(), 4);
    ///     assert_eq!(p.vertices[3].cmd, PathCommand::Close);
    ///
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        let mut path = Self::new();
        let mut pts = points.iter();
        if let Some(&(x, y)) = pts.next() {
            path.move_to(x, y);
            for &(x, y) in pts {
                path.line_to(x, y);
            }
            path.close_polygon();
        }
        path
    }
    /// Axis aligned rectangle from (`x1`,`y1`) to (`x2`,`y2`)
    pub fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::polygon(&[(x1, y1), (x2, y1), (x2, y2), (x1, y2)])
    }
    pub fn remove_all(&mut self) {
        self.vertices.clear();
    }
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push( Vertex::move_to(x,y) );
    }
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push( Vertex::line_to(x,y) );
    }
    pub fn close_polygon(&mut self) {
        if let Some(last) = self.vertices.last().copied() {
            if last.cmd == PathCommand::LineTo {
                self.vertices.push( Vertex::close_polygon(last.x, last.y) );
            }
        }
    }
}

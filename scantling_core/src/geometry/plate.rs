//! # Plates
//!
//! A plate is a thin strip in the section plane between two points. Two
//! shapes are supported:
//!
//! - **Linear**: a straight strip
//! - **Bilge**: a quarter circle whose radius equals both |Δx| and |Δy|
//!
//! A `Spline` slot exists in [`PlateShape`] for free-form strakes; it is not
//! supported and is rejected at construction.
//!
//! ## Orientation
//!
//! A plate runs from `start` to `end`. Its outward normal is the right-hand
//! normal of that direction, and stiffeners stand on the opposite (left)
//! side at `angle + 90°`. Sections are therefore described counter-clockwise
//! around the starboard half, with the inner side of every plate on the left.
//!
//! ## Thickness record
//!
//! ```text
//! net        = max(calculated, empirical, buckling)   once sized
//! as_built   = net − corrosion                        (corrosion ≤ 0)
//! n50        = net − corrosion / 2
//! ```
//!
//! ## Example
//!
//! ```rust
//! use scantling_core::geometry::{Plate, PlateTag, Point, ThicknessBasis};
//! use scantling_core::materials::MaterialGrade;
//! use scantling_core::units::Millimeters;
//!
//! let keel = Plate::new(
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Millimeters(18.0),
//!     MaterialGrade::AH32,
//!     PlateTag::Shell,
//! ).unwrap();
//! assert!((keel.area(ThicknessBasis::AsBuilt) - 4.0 * 0.018).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{Axis, AxisSpec, Point};
use crate::equations::section::{
    parallel_axis, quarter_annulus_inertia, quarter_arc_centroid_distance, rotated_strip_inertia,
};
use crate::errors::{CsrError, CsrResult};
use crate::materials::MaterialGrade;
use crate::units::{Meters, Millimeters};

/// Tolerance on geometric equalities (m)
pub const GEOMETRY_TOLERANCE: f64 = 1.0e-6;

/// Structural role of a plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlateTag {
    Shell,
    InnerBottom,
    Hopper,
    Wing,
    Bilge,
    WeatherDeck,
    Girder,
}

impl PlateTag {
    pub const ALL: [PlateTag; 7] = [
        PlateTag::Shell,
        PlateTag::InnerBottom,
        PlateTag::Hopper,
        PlateTag::Wing,
        PlateTag::Bilge,
        PlateTag::WeatherDeck,
        PlateTag::Girder,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PlateTag::Shell => "Shell",
            PlateTag::InnerBottom => "Inner bottom",
            PlateTag::Hopper => "Hopper",
            PlateTag::Wing => "Topside wing",
            PlateTag::Bilge => "Bilge",
            PlateTag::WeatherDeck => "Weather deck",
            PlateTag::Girder => "Girder",
        }
    }

    /// Part of the watertight hull envelope (sea or weather exposed)
    pub fn is_hull_envelope(&self) -> bool {
        matches!(self, PlateTag::Shell | PlateTag::Bilge | PlateTag::WeatherDeck)
    }
}

impl std::fmt::Display for PlateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Geometric variant of a plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateShape {
    Linear,
    Bilge,
    /// Reserved for free-form strakes; not supported
    Spline,
}

/// Which thickness a derived property is computed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThicknessBasis {
    AsBuilt,
    Net,
    /// Net plus half the corrosion addition (hull girder stiffness)
    N50,
}

/// Thickness record of a plate, all values in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thickness {
    pub as_built: f64,
    pub net: f64,
    /// Required by lateral pressure
    pub calculated: f64,
    /// Rule minimum
    pub empirical: f64,
    /// Required by buckling and slenderness
    pub buckling: f64,
    /// Corrosion reduction, zero or negative
    pub corrosion: f64,
}

impl Thickness {
    /// Record for an as-built thickness with no corrosion assigned yet
    pub fn from_as_built(t: f64) -> Self {
        Thickness {
            as_built: t,
            net: t,
            calculated: 0.0,
            empirical: 0.0,
            buckling: 0.0,
            corrosion: 0.0,
        }
    }

    /// Controlling rule thickness, if any requirement has been computed
    pub fn controlling(&self) -> Option<f64> {
        let t = self.calculated.max(self.empirical).max(self.buckling);
        (t > 0.0).then_some(t)
    }

    /// Whether the scantling engine has written a requirement
    pub fn is_sized(&self) -> bool {
        self.controlling().is_some()
    }

    pub fn n50(&self) -> f64 {
        self.net - 0.5 * self.corrosion
    }

    pub fn for_basis(&self, basis: ThicknessBasis) -> f64 {
        match basis {
            ThicknessBasis::AsBuilt => self.as_built,
            ThicknessBasis::Net => self.net,
            ThicknessBasis::N50 => self.n50(),
        }
    }

    /// Replace the corrosion reduction (not cumulative).
    ///
    /// Before sizing the as-built value is kept and the net follows; after
    /// sizing the net is kept and the as-built follows.
    pub fn set_corrosion(&mut self, reduction: f64) {
        self.corrosion = reduction.min(0.0);
        if self.is_sized() {
            self.as_built = self.net - self.corrosion;
        } else {
            self.net = self.as_built + self.corrosion;
        }
    }

    /// Refresh net and as-built from the rule requirements
    pub fn refresh(&mut self) {
        if let Some(t) = self.controlling() {
            self.net = t;
        }
        self.as_built = self.net - self.corrosion;
    }

    /// Forget the rule requirements (start of a new sizing pass)
    pub fn clear_requirements(&mut self) {
        self.calculated = 0.0;
        self.empirical = 0.0;
        self.buckling = 0.0;
    }
}

/// Area, centroid and centroidal inertias of a section element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionProps {
    pub area: f64,
    pub centroid: Point,
    pub ixx_c: f64,
    pub iyy_c: f64,
}

impl SectionProps {
    /// Moment of inertia about an external axis (parallel axis theorem)
    pub fn i_about(&self, axis: AxisSpec) -> f64 {
        match axis.resolve() {
            (Axis::X, offset) => parallel_axis(self.ixx_c, self.area, self.centroid.y - offset),
            (Axis::Y, offset) => parallel_axis(self.iyy_c, self.area, self.centroid.x - offset),
        }
    }

    /// Combine several elements into one
    pub fn combine<'a, I>(parts: I) -> SectionProps
    where
        I: IntoIterator<Item = &'a SectionProps>,
    {
        let parts: Vec<&SectionProps> = parts.into_iter().collect();
        let area: f64 = parts.iter().map(|p| p.area).sum();
        if area <= 0.0 {
            return SectionProps::default();
        }
        let cx = parts.iter().map(|p| p.area * p.centroid.x).sum::<f64>() / area;
        let cy = parts.iter().map(|p| p.area * p.centroid.y).sum::<f64>() / area;
        let ixx_c = parts
            .iter()
            .map(|p| parallel_axis(p.ixx_c, p.area, p.centroid.y - cy))
            .sum();
        let iyy_c = parts
            .iter()
            .map(|p| parallel_axis(p.iyy_c, p.area, p.centroid.x - cx))
            .sum();
        SectionProps {
            area,
            centroid: Point::new(cx, cy),
            ixx_c,
            iyy_c,
        }
    }
}

/// Arc description of a bilge plate
#[derive(Debug, Clone, Copy, PartialEq)]
struct Arc {
    center: Point,
    radius: f64,
    phi_start: f64,
    sweep: f64,
}

impl Arc {
    fn point_at(&self, fraction: f64) -> Point {
        let phi = self.phi_start + self.sweep * fraction;
        self.center + Point::from_angle(phi) * self.radius
    }

    fn tangent_at(&self, fraction: f64) -> Point {
        let phi = self.phi_start + self.sweep * fraction;
        Point::new(-phi.sin(), phi.cos()) * self.sweep.signum()
    }

    fn fraction_of(&self, p: Point) -> f64 {
        let d = p - self.center;
        let phi = d.y.atan2(d.x);
        (wrap_angle(phi - self.phi_start) / self.sweep).clamp(0.0, 1.0)
    }
}

/// Wrap an angle to (−π, π]
fn wrap_angle(a: f64) -> f64 {
    let mut a = a % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// A structural plate strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub start: Point,
    pub end: Point,
    pub shape: PlateShape,
    pub tag: PlateTag,
    pub material: MaterialGrade,
    pub thickness: Thickness,
    length: f64,
    angle: f64,
    net: SectionProps,
    n50: SectionProps,
}

impl Plate {
    /// Build a plate; bilge-tagged plates get the quarter-circle shape.
    pub fn new(
        start: Point,
        end: Point,
        thickness: Millimeters,
        material: MaterialGrade,
        tag: PlateTag,
    ) -> CsrResult<Self> {
        let shape = if tag == PlateTag::Bilge {
            PlateShape::Bilge
        } else {
            PlateShape::Linear
        };
        Plate::with_shape(start, end, thickness, material, tag, shape)
    }

    /// Build a plate with an explicit shape.
    pub fn with_shape(
        start: Point,
        end: Point,
        thickness: Millimeters,
        material: MaterialGrade,
        tag: PlateTag,
        shape: PlateShape,
    ) -> CsrResult<Self> {
        let entity = format!("plate {:?}→{:?}", <[f64; 2]>::from(start), <[f64; 2]>::from(end));
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx.hypot(dy) < GEOMETRY_TOLERANCE {
            return Err(CsrError::geometry(entity, "zero-length plate"));
        }
        if !(thickness.0.is_finite() && thickness.0 > 0.0) {
            return Err(CsrError::input_schema(entity, format!("thickness {} mm must be positive", thickness.0)));
        }
        let length = match shape {
            PlateShape::Linear => dx.hypot(dy),
            PlateShape::Bilge => {
                if (dx.abs() - dy.abs()).abs() > GEOMETRY_TOLERANCE {
                    return Err(CsrError::geometry(
                        entity,
                        format!("bilge legs differ: |Δx| = {:.4}, |Δy| = {:.4}", dx.abs(), dy.abs()),
                    ));
                }
                PI * dx.abs() / 2.0
            }
            PlateShape::Spline => {
                return Err(CsrError::geometry(entity, "spline plates are not supported"));
            }
        };
        let t: Meters = thickness.into();
        let mut plate = Plate {
            start,
            end,
            shape,
            tag,
            material,
            thickness: Thickness::from_as_built(t.0),
            length,
            angle: dy.atan2(dx),
            net: SectionProps::default(),
            n50: SectionProps::default(),
        };
        plate.recompute();
        Ok(plate)
    }

    /// Length along the plate midline (arc length for bilges)
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Angle of the start→end chord to the horizontal (rad)
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Acute angle of the plate surface to the horizontal, in [0, π/2]
    pub fn surface_angle(&self) -> f64 {
        let a = self.angle.abs() % PI;
        if a > PI / 2.0 {
            PI - a
        } else {
            a
        }
    }

    fn arc(&self) -> Option<Arc> {
        if self.shape != PlateShape::Bilge {
            return None;
        }
        let center = if self.end.y > self.start.y {
            Point::new(self.start.x, self.end.y)
        } else {
            Point::new(self.end.x, self.start.y)
        };
        let ds = self.start - center;
        let de = self.end - center;
        let phi_start = ds.y.atan2(ds.x);
        let sweep = wrap_angle(de.y.atan2(de.x) - phi_start);
        Some(Arc {
            center,
            radius: (self.end.x - self.start.x).abs(),
            phi_start,
            sweep,
        })
    }

    /// Bilge radius (zero for linear plates)
    pub fn radius(&self) -> f64 {
        self.arc().map(|a| a.radius).unwrap_or(0.0)
    }

    /// Point at a fraction (0 = start, 1 = end) of the plate length
    pub fn point_at(&self, fraction: f64) -> Point {
        match self.arc() {
            Some(arc) => arc.point_at(fraction),
            None => self.start.lerp(self.end, fraction),
        }
    }

    /// Unit tangent (start → end direction) at a fraction of the length
    pub fn tangent_at(&self, fraction: f64) -> Point {
        match self.arc() {
            Some(arc) => arc.tangent_at(fraction),
            None => (self.end - self.start).normalized(),
        }
    }

    /// Outward unit normal at a fraction of the length
    pub fn outward_normal_at(&self, fraction: f64) -> Point {
        self.tangent_at(fraction).right_normal()
    }

    /// Fraction of the length at which `p` projects onto the plate, in [0, 1]
    pub fn fraction_of(&self, p: Point) -> f64 {
        match self.arc() {
            Some(arc) => arc.fraction_of(p),
            None => {
                let dir = self.end - self.start;
                ((p - self.start).dot(dir) / dir.dot(dir)).clamp(0.0, 1.0)
            }
        }
    }

    /// Points along the plate for drawing; `arc_samples` intermediate points on bilges.
    pub fn render_points(&self, arc_samples: usize) -> Vec<Point> {
        match self.arc() {
            Some(arc) => (0..=arc_samples + 1)
                .map(|i| arc.point_at(i as f64 / (arc_samples + 1) as f64))
                .collect(),
            None => vec![self.start, self.end],
        }
    }

    /// Section properties for a thickness basis
    pub fn props(&self, basis: ThicknessBasis) -> SectionProps {
        match basis {
            ThicknessBasis::Net => self.net,
            ThicknessBasis::N50 => self.n50,
            ThicknessBasis::AsBuilt => self.props_for(self.thickness.as_built),
        }
    }

    pub fn area(&self, basis: ThicknessBasis) -> f64 {
        self.props(basis).area
    }

    /// Centroid of the plate midline
    pub fn centroid(&self) -> Point {
        match self.arc() {
            Some(arc) => {
                let bisector = arc.phi_start + arc.sweep / 2.0;
                arc.center + Point::from_angle(bisector) * quarter_arc_centroid_distance(arc.radius)
            }
            None => self.start.lerp(self.end, 0.5),
        }
    }

    /// Moment of inertia about an external axis
    pub fn i_about(&self, axis: AxisSpec, basis: ThicknessBasis) -> f64 {
        self.props(basis).i_about(axis)
    }

    fn props_for(&self, t: f64) -> SectionProps {
        let (ixx_c, iyy_c) = match self.shape {
            PlateShape::Bilge => {
                let r = 2.0 * self.length / PI;
                let i = quarter_annulus_inertia(r, t);
                (i, i)
            }
            _ => rotated_strip_inertia(self.length, t, self.angle),
        };
        SectionProps {
            area: self.length * t,
            centroid: self.centroid(),
            ixx_c,
            iyy_c,
        }
    }

    fn recompute(&mut self) {
        self.net = self.props_for(self.thickness.net);
        self.n50 = self.props_for(self.thickness.n50());
    }

    /// Assign a corrosion reduction in mm (positive magnitude); girders are exempt.
    pub fn set_corrosion(&mut self, reduction: Millimeters) {
        if self.tag == PlateTag::Girder {
            self.thickness.set_corrosion(0.0);
        } else {
            let m: Meters = reduction.into();
            self.thickness.set_corrosion(-m.0.abs());
        }
        self.recompute();
    }

    /// Refresh the controlling thickness and every derived quantity.
    pub fn update(&mut self) {
        self.thickness.refresh();
        self.recompute();
    }

    /// As-built thickness in millimetres
    pub fn as_built_mm(&self) -> Millimeters {
        Meters(self.thickness.as_built).into()
    }

    /// Net thickness in millimetres
    pub fn net_mm(&self) -> Millimeters {
        Meters(self.thickness.net).into()
    }
}

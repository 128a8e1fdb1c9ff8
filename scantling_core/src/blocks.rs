//! # Blocks
//!
//! A block is a closed volume of the section (a tank, a hold, the sea, the
//! atmosphere) bounded by an ordered list of panels. Each boundary entry is a
//! signed panel id: a positive id walks the panel from start to end, a
//! negative id from end to start.
//!
//! ## Pressure grid
//!
//! The boundary polyline is densified into a pressure grid. For `n`
//! coordinates and resolution `R` each of the `n − 1` segments contributes
//! `R` points (start included, end excluded) and the final coordinate closes
//! the grid, so the grid holds `(n − 1)(R − 1) + n` points. Every grid point
//! carries the outward normal of its segment and the id of the panel it lies
//! on.
//!
//! ## Sea and atmosphere
//!
//! The sea block is synthesised from every Shell and Bilge panel in id
//! order, closed by buffer coordinates outboard and below the keel. The
//! atmosphere block does the same with the WeatherDeck panels above the deck.
//!
//! ```rust
//! use scantling_core::blocks::grid_len;
//! assert_eq!(grid_len(5, 10), 4 * 9 + 5);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{CsrError, CsrResult};
use crate::geometry::plate::GEOMETRY_TOLERANCE;
use crate::geometry::{PlateShape, PlateTag, Point, StiffenedPanel};
use crate::loads::PressureCase;
use crate::settings::AnalysisSettings;

/// Contents of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpaceType {
    #[serde(rename = "WB")]
    WaterBallast,
    #[serde(rename = "DC")]
    DryCargo,
    #[serde(rename = "LC")]
    LiquidCargo,
    #[serde(rename = "OIL")]
    OilTank,
    #[serde(rename = "FW")]
    FreshWater,
    #[serde(rename = "VOID")]
    VoidSpace,
    #[serde(rename = "SEA")]
    Sea,
    #[serde(rename = "ATM")]
    Atmosphere,
}

impl SpaceType {
    pub const ALL: [SpaceType; 8] = [
        SpaceType::WaterBallast,
        SpaceType::DryCargo,
        SpaceType::LiquidCargo,
        SpaceType::OilTank,
        SpaceType::FreshWater,
        SpaceType::VoidSpace,
        SpaceType::Sea,
        SpaceType::Atmosphere,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            SpaceType::WaterBallast => "WB",
            SpaceType::DryCargo => "DC",
            SpaceType::LiquidCargo => "LC",
            SpaceType::OilTank => "OIL",
            SpaceType::FreshWater => "FW",
            SpaceType::VoidSpace => "VOID",
            SpaceType::Sea => "SEA",
            SpaceType::Atmosphere => "ATM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SpaceType::WaterBallast => "Water ballast",
            SpaceType::DryCargo => "Dry cargo",
            SpaceType::LiquidCargo => "Liquid cargo",
            SpaceType::OilTank => "Oil tank",
            SpaceType::FreshWater => "Fresh water",
            SpaceType::VoidSpace => "Void space",
            SpaceType::Sea => "Sea",
            SpaceType::Atmosphere => "Atmosphere",
        }
    }

    /// Content density used when a block gives none (t/m³)
    pub fn default_density(&self) -> f64 {
        match self {
            SpaceType::WaterBallast | SpaceType::Sea => 1.025,
            SpaceType::DryCargo | SpaceType::FreshWater => 1.0,
            SpaceType::LiquidCargo | SpaceType::OilTank => 0.9,
            SpaceType::VoidSpace | SpaceType::Atmosphere => 0.0,
        }
    }

    /// Tanks filled with a liquid
    pub fn is_liquid(&self) -> bool {
        matches!(
            self,
            SpaceType::WaterBallast | SpaceType::LiquidCargo | SpaceType::OilTank | SpaceType::FreshWater
        )
    }

    /// Spaces the designer describes (everything but sea and atmosphere)
    pub fn is_internal(&self) -> bool {
        !matches!(self, SpaceType::Sea | SpaceType::Atmosphere)
    }
}

impl std::fmt::Display for SpaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Direction in which a block walks a boundary panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Natural,
    Reversed,
}

/// A boundary entry: panel id plus traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryRef {
    pub panel_id: u32,
    pub direction: Direction,
}

impl BoundaryRef {
    /// Resolve a signed id from the section file
    pub fn from_signed(id: i64) -> CsrResult<Self> {
        let panel_id = u32::try_from(id.unsigned_abs())
            .ok()
            .filter(|&p| p != 0)
            .ok_or_else(|| CsrError::input_schema("block ids", format!("invalid panel id {}", id)))?;
        Ok(BoundaryRef {
            panel_id,
            direction: if id > 0 { Direction::Natural } else { Direction::Reversed },
        })
    }

    pub fn signed(&self) -> i64 {
        match self.direction {
            Direction::Natural => i64::from(self.panel_id),
            Direction::Reversed => -i64::from(self.panel_id),
        }
    }
}

/// Side of a panel's plate a block lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelSide {
    /// Stiffener side
    Inner,
    /// Opposite the stiffeners, towards the outward normal
    Outer,
}

/// A vertex of the boundary polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub point: Point,
    /// Panel that registered the vertex (None for buffer vertices)
    pub owner: Option<u32>,
    /// Dry cargo angle coefficient (zero outside dry cargo holds)
    pub k_c: f64,
}

/// A point of the pressure grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub point: Point,
    /// Unit normal pointing out of the block
    pub normal: Point,
    pub owner: Option<u32>,
    pub k_c: f64,
}

/// Number of grid points for `n` coordinates at resolution `r`
pub fn grid_len(n: usize, r: usize) -> usize {
    if n == 0 {
        0
    } else {
        (n - 1) * r + 1
    }
}

/// Dry cargo coefficient K_c = cos²α + (1 − sin ψ)·sin²α.
///
/// `alpha` is the angle of the surface to the horizontal, `psi` the repose
/// angle, both in radians.
pub fn k_c(alpha: f64, psi: f64) -> f64 {
    alpha.cos().powi(2) + (1.0 - psi.sin()) * alpha.sin().powi(2)
}

/// K_c of a panel; hopper, wing and bilge plating carry no cargo pressure factor.
pub fn panel_k_c(panel: &StiffenedPanel, psi: f64) -> f64 {
    match panel.tag() {
        PlateTag::Hopper | PlateTag::Wing | PlateTag::Bilge => 0.0,
        _ => k_c(panel.plate.surface_angle(), psi),
    }
}

/// A closed volume of the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub symmetrical: bool,
    pub space: SpaceType,
    pub boundary: Vec<BoundaryRef>,
    /// Content density (t/m³)
    pub density: f64,
    /// Repose angle ψ of dry cargo (deg)
    pub repose_angle_deg: f64,
    coords: Vec<Coordinate>,
    grid: Vec<GridPoint>,
    centroid: Point,
    counter_clockwise: bool,
    pub pressure: BTreeMap<PressureCase, Vec<f64>>,
}

impl Block {
    /// Create a block from its descriptor; call [`Block::build`] before use.
    pub fn new(
        name: impl Into<String>,
        symmetrical: bool,
        space: SpaceType,
        ids: &[i64],
        density: Option<f64>,
        repose_angle_deg: Option<f64>,
    ) -> CsrResult<Self> {
        let name = name.into();
        if ids.is_empty() {
            return Err(CsrError::input_schema(format!("block {}", name), "no bounding panel ids"));
        }
        let boundary = ids
            .iter()
            .map(|&id| BoundaryRef::from_signed(id))
            .collect::<CsrResult<Vec<_>>>()?;
        let density = density.unwrap_or_else(|| space.default_density());
        if !(density.is_finite() && density >= 0.0) {
            return Err(CsrError::input_schema(format!("block {}", name), "density must not be negative"));
        }
        Ok(Block {
            name,
            symmetrical,
            space,
            boundary,
            density,
            repose_angle_deg: repose_angle_deg.unwrap_or(30.0),
            coords: Vec::new(),
            grid: Vec::new(),
            centroid: Point::default(),
            counter_clockwise: true,
            pressure: BTreeMap::new(),
        })
    }

    /// Synthesise the sea block from every Shell and Bilge panel.
    pub fn sea(panels: &BTreeMap<u32, StiffenedPanel>, settings: &AnalysisSettings) -> CsrResult<Self> {
        let ids: Vec<i64> = panels
            .values()
            .filter(|p| matches!(p.tag(), PlateTag::Shell | PlateTag::Bilge))
            .map(|p| i64::from(p.id))
            .collect();
        if ids.is_empty() {
            return Err(CsrError::geometry("SEA", "no Shell or Bilge panels bound the sea"));
        }
        let mut block = Block::new("SEA", false, SpaceType::Sea, &ids, None, None)?;
        block.walk_boundary(panels, settings)?;
        let d = settings.buffer_distance;
        let (first, last) = block.ends();
        block.push_buffer(Point::new(last.x + d, last.y));
        block.push_buffer(Point::new(last.x + d, -d));
        block.push_buffer(Point::new(first.x, -d));
        block.push_buffer(first);
        block.finish(settings);
        Ok(block)
    }

    /// Synthesise the atmosphere block from every WeatherDeck panel.
    pub fn atmosphere(panels: &BTreeMap<u32, StiffenedPanel>, settings: &AnalysisSettings) -> CsrResult<Self> {
        let ids: Vec<i64> = panels
            .values()
            .filter(|p| p.tag() == PlateTag::WeatherDeck)
            .map(|p| i64::from(p.id))
            .collect();
        if ids.is_empty() {
            return Err(CsrError::geometry("ATM", "no WeatherDeck panels bound the atmosphere"));
        }
        let mut block = Block::new("ATM", false, SpaceType::Atmosphere, &ids, None, None)?;
        block.walk_boundary(panels, settings)?;
        let d = settings.buffer_distance;
        let (first, last) = block.ends();
        block.push_buffer(Point::new(last.x, last.y + d));
        block.push_buffer(Point::new(first.x, first.y + d));
        block.push_buffer(first);
        block.finish(settings);
        Ok(block)
    }

    /// Resolve the boundary against the section's panels and build the grid.
    ///
    /// Fails when a panel id is unknown or the boundary does not close.
    pub fn build(&mut self, panels: &BTreeMap<u32, StiffenedPanel>, settings: &AnalysisSettings) -> CsrResult<()> {
        self.walk_boundary(panels, settings)?;
        let (first, last) = self.ends();
        if !first.approx_eq(last, GEOMETRY_TOLERANCE) {
            return Err(CsrError::geometry(
                format!("block {}", self.name),
                format!(
                    "boundary is open: starts at ({:.3}, {:.3}) and ends at ({:.3}, {:.3})",
                    first.x, first.y, last.x, last.y
                ),
            ));
        }
        self.finish(settings);
        Ok(())
    }

    fn ends(&self) -> (Point, Point) {
        let first = self.coords.first().map(|c| c.point).unwrap_or_default();
        let last = self.coords.last().map(|c| c.point).unwrap_or_default();
        (first, last)
    }

    fn walk_boundary(&mut self, panels: &BTreeMap<u32, StiffenedPanel>, settings: &AnalysisSettings) -> CsrResult<()> {
        self.coords.clear();
        let psi = self.repose_angle_deg.to_radians();
        for (i, entry) in self.boundary.iter().enumerate() {
            let panel = panels.get(&entry.panel_id).ok_or_else(|| {
                CsrError::input_schema(
                    format!("block {}", self.name),
                    format!("references unknown panel id {}", entry.panel_id),
                )
            })?;
            let plate = &panel.plate;
            let (start, end) = match entry.direction {
                Direction::Natural => (plate.start, plate.end),
                Direction::Reversed => (plate.end, plate.start),
            };
            let k_c = if self.space == SpaceType::DryCargo {
                panel_k_c(panel, psi)
            } else {
                0.0
            };
            let owner = Some(entry.panel_id);

            if i == 0 {
                self.coords.push(Coordinate { point: start, owner, k_c });
            } else if let Some(prev) = self.coords.last() {
                if !prev.point.approx_eq(start, GEOMETRY_TOLERANCE) {
                    return Err(CsrError::geometry(
                        format!("block {}", self.name),
                        format!(
                            "panel {} does not continue the boundary: gap of {:.4} m",
                            entry.signed(),
                            prev.point.distance_to(start)
                        ),
                    ));
                }
            }

            if plate.shape == PlateShape::Bilge {
                let m = settings.bilge_samples;
                for j in 1..=m {
                    let f = j as f64 / (m + 1) as f64;
                    let f = match entry.direction {
                        Direction::Natural => f,
                        Direction::Reversed => 1.0 - f,
                    };
                    self.coords.push(Coordinate { point: plate.point_at(f), owner, k_c });
                }
            }
            self.coords.push(Coordinate { point: end, owner, k_c });
        }
        Ok(())
    }

    fn push_buffer(&mut self, point: Point) {
        self.coords.push(Coordinate { point, owner: None, k_c: 0.0 });
    }

    fn finish(&mut self, settings: &AnalysisSettings) {
        self.counter_clockwise = signed_area(&self.coords) >= 0.0;
        self.centroid = self.area_centroid();
        self.grid = self.pressure_grid(settings.grid_resolution.max(1));
        self.pressure.clear();
    }

    fn area_centroid(&self) -> Point {
        let pts: Vec<Point> = self.coords.iter().map(|c| c.point).collect();
        let area = signed_area(&self.coords);
        let centroid = if area.abs() < 1.0e-12 {
            let n = pts.len().max(1) as f64;
            pts.iter().fold(Point::default(), |acc, &p| acc + p) * (1.0 / n)
        } else {
            let (mut cx, mut cy) = (0.0, 0.0);
            for (a, b) in closed_pairs(&pts) {
                let cross = a.x * b.y - b.x * a.y;
                cx += (a.x + b.x) * cross;
                cy += (a.y + b.y) * cross;
            }
            Point::new(cx / (6.0 * area), cy / (6.0 * area))
        };
        if self.symmetrical {
            Point::new(0.0, centroid.y)
        } else {
            centroid
        }
    }

    /// Densify the coordinate polyline at resolution `r`.
    pub fn pressure_grid(&self, r: usize) -> Vec<GridPoint> {
        let r = r.max(1);
        let mut grid = Vec::with_capacity(grid_len(self.coords.len(), r));
        let mut normal = Point::default();
        for pair in self.coords.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let d = b.point - a.point;
            normal = if self.counter_clockwise {
                d.right_normal()
            } else {
                -d.right_normal()
            }
            .normalized();
            for j in 0..r {
                let f = j as f64 / r as f64;
                grid.push(GridPoint {
                    point: a.point.lerp(b.point, f),
                    normal,
                    owner: b.owner,
                    k_c: a.k_c + (b.k_c - a.k_c) * f,
                });
            }
        }
        if let Some(last) = self.coords.last() {
            grid.push(GridPoint {
                point: last.point,
                normal,
                owner: last.owner,
                k_c: last.k_c,
            });
        }
        grid
    }

    pub fn coords(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn grid(&self) -> &[GridPoint] {
        &self.grid
    }

    /// Area centroid in the section plane (x = 0 for symmetrical blocks)
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// Centroid in ship coordinates (x along the ship at midship)
    pub fn centroid_3d(&self, l_sc: f64) -> [f64; 3] {
        [l_sc / 2.0, self.centroid.x, self.centroid.y]
    }

    /// Highest point of the boundary
    pub fn z_top(&self) -> f64 {
        self.coords
            .iter()
            .map(|c| c.point.y)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.counter_clockwise
    }

    /// Traversal direction of a panel, if it bounds this block
    pub fn direction_of(&self, panel_id: u32) -> Option<Direction> {
        self.boundary
            .iter()
            .find(|b| b.panel_id == panel_id)
            .map(|b| b.direction)
    }

    /// Side of the panel's plate on which this block lies
    pub fn side_of(&self, panel_id: u32) -> Option<PanelSide> {
        self.direction_of(panel_id).map(|dir| {
            let left = (dir == Direction::Natural) == self.counter_clockwise;
            if left {
                PanelSide::Inner
            } else {
                PanelSide::Outer
            }
        })
    }

    /// Grid indices on a panel, followed by the next corner point
    pub fn slice(&self, panel_id: u32) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .grid
            .iter()
            .enumerate()
            .filter(|(_, g)| g.owner == Some(panel_id))
            .map(|(i, _)| i)
            .collect();
        if let Some(&last) = indices.last() {
            if last + 1 < self.grid.len() {
                indices.push(last + 1);
            }
        }
        indices
    }

    pub fn set_pressure(&mut self, case: PressureCase, values: Vec<f64>) {
        self.pressure.insert(case, values);
    }
}

fn closed_pairs(pts: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = pts.len();
    (0..n).map(move |i| (pts[i], pts[(i + 1) % n]))
}

/// Shoelace signed area; positive for counter-clockwise polylines.
fn signed_area(coords: &[Coordinate]) -> f64 {
    let pts: Vec<Point> = coords.iter().map(|c| c.point).collect();
    closed_pairs(&pts)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Plate, StiffenerLayout};
    use crate::materials::MaterialGrade;
    use crate::units::Millimeters;
    use approx::assert_abs_diff_eq;

    fn panel(id: u32, start: (f64, f64), end: (f64, f64), tag: PlateTag) -> StiffenedPanel {
        let plate = Plate::new(
            Point::new(start.0, start.1),
            Point::new(end.0, end.1),
            Millimeters(14.0),
            MaterialGrade::A,
            tag,
        )
        .unwrap();
        let layout = StiffenerLayout {
            spacing_mm: 800.0,
            s_pad_mm: 400.0,
            e_pad_mm: 400.0,
            skip: 0,
            psm_spacing_m: 3.6,
        };
        StiffenedPanel::new(id, plate, None, layout, false).unwrap()
    }

    /// Box tank 0..10 × 0..5 with a bilge-free boundary
    fn box_panels() -> BTreeMap<u32, StiffenedPanel> {
        [
            panel(1, (0.0, 0.0), (10.0, 0.0), PlateTag::Shell),
            panel(2, (10.0, 0.0), (10.0, 5.0), PlateTag::Shell),
            panel(3, (10.0, 5.0), (0.0, 5.0), PlateTag::WeatherDeck),
            panel(4, (0.0, 5.0), (0.0, 0.0), PlateTag::Girder),
        ]
        .into_iter()
        .map(|p| (p.id, p))
        .collect()
    }

    #[test]
    fn test_grid_length_and_closure() {
        let panels = box_panels();
        let settings = AnalysisSettings::default();
        let mut block = Block::new("WB", true, SpaceType::WaterBallast, &[1, 2, 3, 4], None, None).unwrap();
        block.build(&panels, &settings).unwrap();
        let n = block.coords().len();
        assert_eq!(n, 5);
        for r in [1, 4, 10] {
            let grid = block.pressure_grid(r);
            assert_eq!(grid.len(), (n - 1) * (r - 1) + n);
            assert!(grid[0].point.approx_eq(grid[grid.len() - 1].point, 1e-12));
        }
    }

    #[test]
    fn test_normals_point_out_of_the_block() {
        let panels = box_panels();
        let mut block = Block::new("WB", false, SpaceType::WaterBallast, &[1, 2, 3, 4], None, None).unwrap();
        block.build(&panels, &AnalysisSettings::default()).unwrap();
        assert!(block.is_counter_clockwise());
        let bottom = block.grid().iter().find(|g| g.owner == Some(1)).unwrap();
        assert_abs_diff_eq!(bottom.normal.y, -1.0, epsilon = 1e-12);
        assert_eq!(block.side_of(1), Some(PanelSide::Inner));

        // Walking the same box clockwise keeps normals outward
        let mut reversed = Block::new("WB-R", false, SpaceType::WaterBallast, &[-4, -3, -2, -1], None, None).unwrap();
        reversed.build(&panels, &AnalysisSettings::default()).unwrap();
        assert!(!reversed.is_counter_clockwise());
        let bottom = reversed.grid().iter().find(|g| g.owner == Some(1)).unwrap();
        assert_abs_diff_eq!(bottom.normal.y, -1.0, epsilon = 1e-12);
        assert_eq!(reversed.side_of(1), Some(PanelSide::Inner));
    }

    #[test]
    fn test_area_centroid() {
        let panels = box_panels();
        let mut block = Block::new("WB", false, SpaceType::WaterBallast, &[1, 2, 3, 4], None, None).unwrap();
        block.build(&panels, &AnalysisSettings::default()).unwrap();
        assert_abs_diff_eq!(block.centroid().x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(block.centroid().y, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(block.z_top(), 5.0);

        let mut sym = Block::new("WB", true, SpaceType::WaterBallast, &[1, 2, 3, 4], None, None).unwrap();
        sym.build(&panels, &AnalysisSettings::default()).unwrap();
        assert_eq!(sym.centroid().x, 0.0);
        let [x, y, z] = sym.centroid_3d(180.0);
        assert_eq!((x, y), (90.0, 0.0));
        assert_abs_diff_eq!(z, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_open_boundary_is_fatal() {
        let panels = box_panels();
        let mut block = Block::new("HOLD", false, SpaceType::DryCargo, &[1, 2, 3], None, None).unwrap();
        let err = block.build(&panels, &AnalysisSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY_INVARIANT");

        let mut gap = Block::new("HOLD", false, SpaceType::DryCargo, &[1, 3], None, None).unwrap();
        assert!(gap.build(&panels, &AnalysisSettings::default()).is_err());
    }

    #[test]
    fn test_unknown_panel_is_input_error() {
        let panels = box_panels();
        let mut block = Block::new("X", false, SpaceType::VoidSpace, &[1, 9], None, None).unwrap();
        let err = block.build(&panels, &AnalysisSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_SCHEMA");
        assert!(BoundaryRef::from_signed(0).is_err());
    }

    #[test]
    fn test_k_c_angle_dependency() {
        let psi = 30.0_f64.to_radians();
        assert_abs_diff_eq!(k_c(0.0, psi), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(k_c(30.0_f64.to_radians(), psi), 0.875, epsilon = 1e-12);
        let hopper = panel(8, (16.0, 6.8), (11.0, 1.8), PlateTag::Hopper);
        assert_eq!(panel_k_c(&hopper, psi), 0.0);
        let inner_bottom = panel(7, (11.0, 1.8), (0.0, 1.8), PlateTag::InnerBottom);
        assert_abs_diff_eq!(panel_k_c(&inner_bottom, psi), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sea_and_atmosphere_synthesis() {
        let panels = box_panels();
        let settings = AnalysisSettings::default();
        let sea = Block::sea(&panels, &settings).unwrap();
        assert_eq!(sea.space, SpaceType::Sea);
        // 3 hull vertices + 3 buffers + closing vertex
        assert_eq!(sea.coords().len(), 7);
        assert!(!sea.is_counter_clockwise());
        assert_eq!(sea.side_of(1), Some(PanelSide::Outer));
        let keel = sea.grid().iter().find(|g| g.owner == Some(1)).unwrap();
        assert_abs_diff_eq!(keel.normal.y, 1.0, epsilon = 1e-12);

        let atm = Block::atmosphere(&panels, &settings).unwrap();
        assert_eq!(atm.coords().len(), 5);
        let deck = atm.grid().iter().find(|g| g.owner == Some(3)).unwrap();
        assert_abs_diff_eq!(deck.normal.y, -1.0, epsilon = 1e-12);
        assert_eq!(atm.side_of(3), Some(PanelSide::Outer));
    }

    #[test]
    fn test_missing_bounding_panels_is_fatal() {
        let panels: BTreeMap<u32, StiffenedPanel> =
            [panel(1, (0.0, 0.0), (10.0, 0.0), PlateTag::InnerBottom)].into_iter().map(|p| (p.id, p)).collect();
        assert!(Block::sea(&panels, &AnalysisSettings::default()).is_err());
        assert!(Block::atmosphere(&panels, &AnalysisSettings::default()).is_err());
    }

    #[test]
    fn test_slice_includes_following_corner() {
        let panels = box_panels();
        let mut block = Block::new("WB", false, SpaceType::WaterBallast, &[1, 2, 3, 4], None, None).unwrap();
        block.build(&panels, &AnalysisSettings::default()).unwrap();
        let slice = block.slice(1);
        assert_eq!(slice.len(), 11);
        let last = block.grid()[slice[10]].point;
        assert!(last.approx_eq(Point::new(10.0, 0.0), 1e-12));
    }
}

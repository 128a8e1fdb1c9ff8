//! # Ship Section
//!
//! The midship section is the root container of an analysis: principal
//! particulars, the stiffened panels keyed by id, the user blocks and the
//! synthesised sea and atmosphere blocks, plus the global hull girder
//! properties derived from them.
//!
//! ## Structure
//!
//! ```text
//! ShipSection
//! ├── particulars: Particulars (LBP, L_sc, B, T, T_min, T_sc, D, C_b, ...)
//! ├── panels: BTreeMap<u32, StiffenedPanel>
//! ├── blocks: Vec<Block> (user tanks and holds)
//! ├── sea, atmosphere: Block
//! └── global: GlobalProperties (κ, C_w, moments, n50 inertias, moduli)
//! ```
//!
//! Global properties are refreshed by [`ShipSection::update`], which the
//! scantling pipeline calls at every stage boundary. Null panels carry
//! pressure but stay out of the hull girder. For a symmetrical section only
//! the starboard half is modelled and the global properties are doubled.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::blocks::Block;
use crate::errors::{CsrError, CsrResult};
use crate::geometry::plate::GEOMETRY_TOLERANCE;
use crate::geometry::{AxisSpec, Axis, PlateTag, StiffenedPanel, ThicknessBasis};
use crate::loads::hull_girder;
use crate::materials::material_factor;
use crate::settings::{AnalysisSettings, Draught};

/// Principal particulars of the ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particulars {
    /// Length between perpendiculars (m)
    pub lbp: f64,
    /// Rule length L_sc (m)
    pub l_sc: f64,
    /// Moulded breadth (m)
    pub b: f64,
    /// Design draught (m)
    pub t: f64,
    /// Minimum ballast draught (m)
    pub t_min: f64,
    /// Scantling draught (m)
    pub t_sc: f64,
    /// Moulded depth (m)
    pub d: f64,
    pub c_b: f64,
    pub c_p: f64,
    pub c_m: f64,
    /// Deadweight (t)
    pub dwt: f64,
}

impl Particulars {
    /// Particulars of the sample Supramax-size bulk carrier used in demos and tests
    pub fn sample_bulk_carrier() -> Self {
        Particulars {
            lbp: 180.0,
            l_sc: 180.0,
            b: 32.0,
            t: 15.3,
            t_min: 7.0,
            t_sc: 15.3,
            d: 22.0,
            c_b: 0.82,
            c_p: 0.83,
            c_m: 0.99,
            dwt: 55_000.0,
        }
    }

    /// Check rule applicability.
    pub fn validate(&self) -> CsrResult<()> {
        let fields = [
            ("LBP", self.lbp),
            ("Lsc", self.l_sc),
            ("B", self.b),
            ("T", self.t),
            ("Tmin", self.t_min),
            ("Tsc", self.t_sc),
            ("D", self.d),
            ("Cb", self.c_b),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(CsrError::input_schema("particulars", format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(90.0..=500.0).contains(&self.lbp) {
            return Err(CsrError::rule_domain(
                "LBP",
                self.lbp.to_string(),
                "Pt 1 Ch 1 Sec 1 [1.1]",
                "rules apply to ships of length 90 m to 500 m",
            ));
        }
        if self.c_b > 1.0 {
            return Err(CsrError::input_schema("particulars", "Cb must not exceed 1"));
        }
        if self.t_min > self.t_sc {
            return Err(CsrError::rule_domain(
                "Tmin",
                self.t_min.to_string(),
                "Pt 1 Ch 4 Sec 8",
                "minimum draught exceeds the scantling draught",
            ));
        }
        if self.t_sc >= self.d {
            return Err(CsrError::input_schema("particulars", "Tsc must be below the depth D"));
        }
        Ok(())
    }

    /// Loading draught of a condition
    pub fn draught(&self, draught: Draught) -> f64 {
        match draught {
            Draught::Scantling => self.t_sc,
            Draught::Minimum => self.t_min,
        }
    }
}

/// Neutral axis and inertias used for hull girder stresses (m, m⁴)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HullGirderProperties {
    /// Height of the horizontal neutral axis above base
    pub y_n: f64,
    /// Vertical bending inertia about the horizontal neutral axis
    pub i_xx: f64,
    /// Horizontal bending inertia about the vertical neutral axis
    pub i_yy: f64,
}

/// Area and inertias of the full section on one thickness basis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionInertia {
    /// Cross-section area (m²)
    pub area: f64,
    /// Transverse centroid x_o (m)
    pub x_o: f64,
    /// Vertical centroid y_o, the neutral axis (m)
    pub y_o: f64,
    pub i_xx: f64,
    pub i_yy: f64,
}

impl SectionInertia {
    pub fn hull_girder(&self) -> HullGirderProperties {
        HullGirderProperties {
            y_n: self.y_o,
            i_xx: self.i_xx,
            i_yy: self.i_yy,
        }
    }
}

/// Derived global quantities of the section
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalProperties {
    /// Material factor κ
    pub kappa: f64,
    /// Wave coefficient C_w
    pub c_w: f64,
    /// Acceleration parameter a_0
    pub a_0: f64,
    /// Vertical wave moments (kNm), sagging negative
    pub m_wv_hog: f64,
    pub m_wv_sag: f64,
    /// Permissible still water moments (kNm), sagging negative
    pub m_sw_hog: f64,
    pub m_sw_sag: f64,
    /// Horizontal wave moment at T_sc (kNm)
    pub m_wh: f64,
    pub net: SectionInertia,
    pub n50: SectionInertia,
    /// Highest and lowest structural points (m)
    pub z_top: f64,
    pub z_bottom: f64,
    /// n50 section moduli at deck and keel (m³)
    pub z_deck: f64,
    pub z_keel: f64,
}

/// The midship section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSection {
    pub particulars: Particulars,
    pub symmetrical: bool,
    pub panels: BTreeMap<u32, StiffenedPanel>,
    pub blocks: Vec<Block>,
    pub sea: Block,
    pub atmosphere: Block,
    pub global: GlobalProperties,
}

impl ShipSection {
    /// Assemble a section: validate, resolve the blocks, synthesise sea and
    /// atmosphere, compute the global properties.
    pub fn new(
        particulars: Particulars,
        symmetrical: bool,
        panels: Vec<StiffenedPanel>,
        mut blocks: Vec<Block>,
        settings: &AnalysisSettings,
    ) -> CsrResult<Self> {
        particulars.validate()?;
        settings.validate()?;

        let mut by_id = BTreeMap::new();
        for panel in panels {
            let id = panel.id;
            if by_id.insert(id, panel).is_some() {
                return Err(CsrError::input_schema(format!("panel {}", id), "duplicate panel id"));
            }
        }

        let mut names = BTreeSet::new();
        for block in &mut blocks {
            if !block.space.is_internal() {
                return Err(CsrError::input_schema(
                    format!("block {}", block.name),
                    "SEA and ATM blocks are synthesised, not declared",
                ));
            }
            if !names.insert(block.name.clone()) {
                return Err(CsrError::input_schema(format!("block {}", block.name), "duplicate block name"));
            }
            block.build(&by_id, settings)?;
        }

        let sea = Block::sea(&by_id, settings)?;
        let atmosphere = Block::atmosphere(&by_id, settings)?;

        let mut section = ShipSection {
            particulars,
            symmetrical,
            panels: by_id,
            blocks,
            sea,
            atmosphere,
            global: GlobalProperties::default(),
        };
        section.update();
        log::info!(
            "section assembled: {} panels, {} blocks, y_n = {:.3} m",
            section.panels.len(),
            section.blocks.len(),
            section.global.n50.y_o
        );
        Ok(section)
    }

    /// Every block: user blocks, then sea, then atmosphere
    pub fn all_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().chain([&self.sea, &self.atmosphere])
    }

    pub fn all_blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.blocks
            .iter_mut()
            .chain([&mut self.sea, &mut self.atmosphere])
    }

    /// Blocks bounded by a panel
    pub fn blocks_of(&self, panel_id: u32) -> impl Iterator<Item = &Block> {
        self.all_blocks().filter(move |b| b.direction_of(panel_id).is_some())
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.all_blocks().find(|b| b.name == name)
    }

    pub fn panel(&self, id: u32) -> CsrResult<&StiffenedPanel> {
        self.panels
            .get(&id)
            .ok_or_else(|| CsrError::input_schema(format!("panel {}", id), "unknown panel id"))
    }

    /// Panels taking part in the hull girder
    pub fn strength_panels(&self) -> impl Iterator<Item = &StiffenedPanel> {
        self.panels.values().filter(|p| !p.null)
    }

    /// Whether a Shell panel touches the keel point (0, 0)
    pub fn is_keel(&self, panel: &StiffenedPanel) -> bool {
        panel.tag() == PlateTag::Shell
            && (panel.plate.start.norm() < 1.0e-6 || panel.plate.end.norm() < 1.0e-6)
    }

    /// Hull girder properties on the n50 basis
    pub fn hull_girder(&self) -> HullGirderProperties {
        self.global.n50.hull_girder()
    }

    /// Recompute every derived global quantity from the current panels.
    pub fn update(&mut self) {
        let p = &self.particulars;
        let (l, b, c_b) = (p.l_sc, p.b, p.c_b);

        let kappa = material_factor(
            self.strength_panels()
                .filter(|panel| panel.tag() != PlateTag::Girder)
                .map(|panel| (panel.plate.material, panel.plate.area(ThicknessBasis::Net))),
        );

        let net = self.inertia(ThicknessBasis::Net);
        let n50 = self.inertia(ThicknessBasis::N50);

        let ys = self
            .strength_panels()
            .flat_map(|panel| [panel.plate.start.y, panel.plate.end.y]);
        let (z_bottom, z_top) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
        let (z_bottom, z_top) = if z_top.is_finite() { (z_bottom, z_top) } else { (0.0, 0.0) };

        let lever_deck = z_top - n50.y_o;
        let lever_keel = n50.y_o - z_bottom;

        self.global = GlobalProperties {
            kappa,
            c_w: hull_girder::wave_coefficient(l),
            a_0: hull_girder::acceleration_parameter(l, c_b),
            m_wv_hog: hull_girder::wave_moment_hog(l, b, c_b),
            m_wv_sag: hull_girder::wave_moment_sag(l, b, c_b),
            m_sw_hog: hull_girder::still_water_moment_hog(l, b, c_b),
            m_sw_sag: hull_girder::still_water_moment_sag(l, b, c_b),
            m_wh: hull_girder::horizontal_wave_moment(l, p.t_sc, c_b),
            net,
            n50,
            z_top,
            z_bottom,
            z_deck: if lever_deck > 0.0 { n50.i_xx / lever_deck } else { 0.0 },
            z_keel: if lever_keel > 0.0 { n50.i_xx / lever_keel } else { 0.0 },
        };
    }

    /// How many times a panel appears in the full section: twice for a
    /// mirrored half, once for members on the centreline.
    pub fn mirror_weight(&self, panel: &StiffenedPanel) -> f64 {
        let on_centreline =
            panel.plate.start.x.abs() < GEOMETRY_TOLERANCE && panel.plate.end.x.abs() < GEOMETRY_TOLERANCE;
        if self.symmetrical && !on_centreline {
            2.0
        } else {
            1.0
        }
    }

    /// Area, centroid and inertias of the whole section on one basis
    pub fn inertia(&self, basis: ThicknessBasis) -> SectionInertia {
        let props: Vec<_> = self
            .strength_panels()
            .map(|p| (self.mirror_weight(p), p.props(basis)))
            .collect();
        let area: f64 = props.iter().map(|(w, p)| w * p.area).sum();
        if area <= 0.0 {
            return SectionInertia::default();
        }
        let y_o = props.iter().map(|(w, p)| w * p.area * p.centroid.y).sum::<f64>() / area;
        let x_o = if self.symmetrical {
            0.0
        } else {
            props.iter().map(|(_, p)| p.area * p.centroid.x).sum::<f64>() / area
        };

        let i_xx: f64 = props
            .iter()
            .map(|(w, p)| w * p.i_about(AxisSpec::AboutOffset { axis: Axis::X, offset: y_o }))
            .sum();
        let i_yy: f64 = props
            .iter()
            .map(|(w, p)| w * p.i_about(AxisSpec::AboutOffset { axis: Axis::Y, offset: x_o }))
            .sum();

        SectionInertia { area, x_o, y_o, i_xx, i_yy }
    }

    /// Moment of inertia of the full section about an external axis
    pub fn i_about(&self, axis: AxisSpec, basis: ThicknessBasis) -> f64 {
        let inertia = self.inertia(basis);
        match axis.resolve() {
            (Axis::X, offset) => inertia.i_xx + inertia.area * (inertia.y_o - offset).powi(2),
            (Axis::Y, offset) => inertia.i_yy + inertia.area * (inertia.x_o - offset).powi(2),
        }
    }
}

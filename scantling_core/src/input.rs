//! # Section File
//!
//! The JSON description of a midship section, read at the start of a run
//! and written back with the sized thicknesses at the end.
//!
//! ## Structure
//!
//! ```text
//! SectionFile
//! ├── version (optional semver string)
//! ├── LBP, Lsc, B, T, Tmin, Tsc, D, Cb, Cp, Cm, DWT
//! ├── symmetrical (optional, default true)
//! ├── geometry: [PanelDescriptor]
//! │   ├── id, plate {start, end, thickness_mm, material, tag}
//! │   ├── stiffeners: {} | {type, dimensions {lw, bw[, lf, bf]}, material}
//! │   └── spacing_mm, s_pad_mm, e_pad_mm, skip, PSM_spacing_m[, null]
//! └── blocks: [BlockDescriptor]
//!     └── name, symmetrical, type, ids[, density, repose_angle_deg]
//! ```
//!
//! A section exported with [`SectionFile::from_section`] loads back into the
//! same geometry, so a sized section can be fed into another iteration.

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, SpaceType};
use crate::errors::{CsrError, CsrResult};
use crate::geometry::{
    Plate, PlateTag, Point, StiffenedPanel, StiffenerDimensions, StiffenerForm, StiffenerLayout, StiffenerProfile,
};
use crate::materials::MaterialGrade;
use crate::section::{Particulars, ShipSection};
use crate::settings::AnalysisSettings;
use crate::units::Millimeters;

/// Current schema version of section files
pub const SCHEMA_VERSION: &str = "1.0.0";

fn default_symmetrical() -> bool {
    true
}

/// Thicknesses and dimensions are written with a micrometre resolution
fn round_mm(value: f64) -> f64 {
    (value * 1.0e6).round() / 1.0e6
}

/// Root of a section file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "LBP")]
    pub lbp: f64,
    #[serde(rename = "Lsc")]
    pub l_sc: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "T")]
    pub t: f64,
    #[serde(rename = "Tmin")]
    pub t_min: f64,
    #[serde(rename = "Tsc")]
    pub t_sc: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "Cb")]
    pub c_b: f64,
    #[serde(rename = "Cp")]
    pub c_p: f64,
    #[serde(rename = "Cm")]
    pub c_m: f64,
    #[serde(rename = "DWT")]
    pub dwt: f64,
    #[serde(default = "default_symmetrical")]
    pub symmetrical: bool,
    pub geometry: Vec<PanelDescriptor>,
    pub blocks: Vec<BlockDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateDescriptor {
    pub start: Point,
    pub end: Point,
    pub thickness_mm: f64,
    pub material: String,
    pub tag: PlateTag,
}

/// Stiffener profile of a panel; `{}` when the panel is unstiffened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StiffenerDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub form: Option<StiffenerForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<StiffenerDimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub id: u32,
    pub plate: PlateDescriptor,
    #[serde(default)]
    pub stiffeners: StiffenerDescriptor,
    pub spacing_mm: f64,
    pub s_pad_mm: f64,
    pub e_pad_mm: f64,
    #[serde(default)]
    pub skip: u32,
    #[serde(rename = "PSM_spacing_m")]
    pub psm_spacing_m: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub null: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub name: String,
    pub symmetrical: bool,
    #[serde(rename = "type")]
    pub space: SpaceType,
    pub ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repose_angle_deg: Option<f64>,
}

/// Re-attribute a material parse error to the panel it came from
fn parse_material(code: &str, entity: &str) -> CsrResult<MaterialGrade> {
    code.parse::<MaterialGrade>().map_err(|e| match e {
        CsrError::InputSchema { reason, .. } => CsrError::input_schema(entity, reason),
        other => other,
    })
}

impl StiffenerDescriptor {
    pub fn is_empty(&self) -> bool {
        self.form.is_none() && self.dimensions.is_none() && self.material.is_none()
    }

    fn profile(&self, panel_id: u32) -> CsrResult<Option<StiffenerProfile>> {
        let entity = format!("panel {} stiffeners", panel_id);
        match (self.form, self.dimensions, self.material.as_deref()) {
            (None, None, None) => Ok(None),
            (Some(form), Some(dimensions), Some(material)) => Ok(Some(StiffenerProfile {
                form,
                dimensions,
                material: parse_material(material, &entity)?,
            })),
            _ => Err(CsrError::input_schema(
                entity,
                "type, dimensions and material must be given together, or the descriptor left empty",
            )),
        }
    }

    fn from_panel(panel: &StiffenedPanel) -> Self {
        let Some(profile) = panel.profile else {
            return StiffenerDescriptor::default();
        };
        // every stiffener of a panel is sized alike; the first stands for all
        let d = panel
            .stiffeners
            .first()
            .map(|s| s.dimensions())
            .unwrap_or(profile.dimensions);
        StiffenerDescriptor {
            form: Some(profile.form),
            dimensions: Some(StiffenerDimensions {
                lw: round_mm(d.lw),
                bw: round_mm(d.bw),
                lf: d.lf.map(round_mm),
                bf: d.bf.map(round_mm),
            }),
            material: Some(profile.material.code().to_string()),
        }
    }
}

impl PanelDescriptor {
    pub fn to_panel(&self) -> CsrResult<StiffenedPanel> {
        if self.id == 0 {
            return Err(CsrError::input_schema("panel 0", "panel ids start at 1"));
        }
        let entity = format!("panel {}", self.id);
        let material = parse_material(&self.plate.material, &entity)?;
        let plate = Plate::new(
            self.plate.start,
            self.plate.end,
            Millimeters(self.plate.thickness_mm),
            material,
            self.plate.tag,
        )
        .map_err(|e| match e {
            CsrError::GeometryInvariant { reason, .. } => CsrError::geometry(entity.clone(), reason),
            CsrError::InputSchema { reason, .. } => CsrError::input_schema(entity.clone(), reason),
            other => other,
        })?;
        let layout = StiffenerLayout {
            spacing_mm: self.spacing_mm,
            s_pad_mm: self.s_pad_mm,
            e_pad_mm: self.e_pad_mm,
            skip: self.skip,
            psm_spacing_m: self.psm_spacing_m,
        };
        StiffenedPanel::new(self.id, plate, self.stiffeners.profile(self.id)?, layout, self.null)
    }

    pub fn from_panel(panel: &StiffenedPanel) -> Self {
        PanelDescriptor {
            id: panel.id,
            plate: PlateDescriptor {
                start: panel.plate.start,
                end: panel.plate.end,
                thickness_mm: round_mm(panel.plate.as_built_mm().0),
                material: panel.plate.material.code().to_string(),
                tag: panel.tag(),
            },
            stiffeners: StiffenerDescriptor::from_panel(panel),
            spacing_mm: panel.layout.spacing_mm,
            s_pad_mm: panel.layout.s_pad_mm,
            e_pad_mm: panel.layout.e_pad_mm,
            skip: panel.layout.skip,
            psm_spacing_m: panel.layout.psm_spacing_m,
            null: panel.null,
        }
    }
}

impl BlockDescriptor {
    pub fn to_block(&self, settings: &AnalysisSettings) -> CsrResult<Block> {
        Block::new(
            self.name.clone(),
            self.symmetrical,
            self.space,
            &self.ids,
            self.density,
            Some(self.repose_angle_deg.unwrap_or(settings.repose_angle_deg)),
        )
    }

    pub fn from_block(block: &Block) -> Self {
        BlockDescriptor {
            name: block.name.clone(),
            symmetrical: block.symmetrical,
            space: block.space,
            ids: block.boundary.iter().map(|b| b.signed()).collect(),
            density: Some(block.density),
            repose_angle_deg: (block.space == SpaceType::DryCargo).then_some(block.repose_angle_deg),
        }
    }
}

impl SectionFile {
    /// Parse a section file; any malformed or missing key is an input error.
    pub fn from_json(json: &str) -> CsrResult<Self> {
        serde_json::from_str(json).map_err(|e| CsrError::input_schema("section file", e.to_string()))
    }

    pub fn to_json(&self) -> CsrResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CsrError::SerializationError { reason: e.to_string() })
    }

    pub fn particulars(&self) -> Particulars {
        Particulars {
            lbp: self.lbp,
            l_sc: self.l_sc,
            b: self.b,
            t: self.t,
            t_min: self.t_min,
            t_sc: self.t_sc,
            d: self.d,
            c_b: self.c_b,
            c_p: self.c_p,
            c_m: self.c_m,
            dwt: self.dwt,
        }
    }

    /// Build the section model
    pub fn to_section(&self, settings: &AnalysisSettings) -> CsrResult<ShipSection> {
        let panels = self
            .geometry
            .iter()
            .map(PanelDescriptor::to_panel)
            .collect::<CsrResult<Vec<_>>>()?;
        let blocks = self
            .blocks
            .iter()
            .map(|b| b.to_block(settings))
            .collect::<CsrResult<Vec<_>>>()?;
        ShipSection::new(self.particulars(), self.symmetrical, panels, blocks, settings)
    }

    /// Describe a section with its current as-built scantlings
    pub fn from_section(section: &ShipSection) -> Self {
        let p = &section.particulars;
        SectionFile {
            version: Some(SCHEMA_VERSION.to_string()),
            lbp: p.lbp,
            l_sc: p.l_sc,
            b: p.b,
            t: p.t,
            t_min: p.t_min,
            t_sc: p.t_sc,
            d: p.d,
            c_b: p.c_b,
            c_p: p.c_p,
            c_m: p.c_m,
            dwt: p.dwt,
            symmetrical: section.symmetrical,
            geometry: section.panels.values().map(PanelDescriptor::from_panel).collect(),
            blocks: section.blocks.iter().map(BlockDescriptor::from_block).collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) const DEMO: &str = include_str!("../../demos/bulk_carrier_midship.json");

    pub(crate) fn demo_section() -> ShipSection {
        SectionFile::from_json(DEMO)
            .unwrap()
            .to_section(&AnalysisSettings::default())
            .unwrap()
    }

    #[test]
    fn test_demo_section_loads() {
        let file = SectionFile::from_json(DEMO).unwrap();
        assert_eq!(file.version.as_deref(), Some(SCHEMA_VERSION));
        assert_eq!(file.geometry.len(), 14);

        let section = demo_section();
        assert_eq!(section.panels.len(), 14);
        assert_eq!(section.blocks.len(), 3);
        assert!(section.panels[&3].stiffeners.is_empty());
        assert!(section.panels[&8].null);
        assert_eq!(section.block("HOLD").unwrap().repose_angle_deg, 35.0);
        assert_eq!(section.block("WB1").unwrap().repose_angle_deg, 30.0);
    }

    #[test]
    fn test_export_reloads_to_the_same_section() {
        let first = demo_section();
        let json = SectionFile::from_section(&first).to_json().unwrap();
        let second = SectionFile::from_json(&json)
            .unwrap()
            .to_section(&AnalysisSettings::default())
            .unwrap();

        assert_eq!(first.panels.len(), second.panels.len());
        for (id, a) in &first.panels {
            let b = &second.panels[id];
            assert_eq!(a.plate.start, b.plate.start);
            assert_eq!(a.plate.end, b.plate.end);
            assert_eq!(a.tag(), b.tag());
            assert_relative_eq!(a.plate.as_built_mm().0, b.plate.as_built_mm().0, max_relative = 1e-12);
            assert_eq!(a.stiffeners.len(), b.stiffeners.len());
        }
        for (a, b) in first.blocks.iter().zip(&second.blocks) {
            assert_eq!(a.boundary, b.boundary);
            assert_eq!(a.space, b.space);
            assert_relative_eq!(a.density, b.density);
        }
        assert_relative_eq!(first.global.n50.i_xx, second.global.n50.i_xx, max_relative = 1e-9);
    }

    #[test]
    fn test_export_carries_sized_thickness() {
        let mut section = demo_section();
        let panel = section.panels.get_mut(&2).unwrap();
        panel.plate.thickness.empirical = 0.0205;
        panel.update();
        let file = SectionFile::from_section(&section);
        let exported = file.geometry.iter().find(|p| p.id == 2).unwrap();
        assert_eq!(exported.plate.thickness_mm, 20.5);
    }

    #[test]
    fn test_empty_stiffener_descriptor() {
        let d: StiffenerDescriptor = serde_json::from_str("{}").unwrap();
        assert!(d.is_empty());
        assert_eq!(d.profile(1).unwrap(), None);
        assert_eq!(serde_json::to_string(&d).unwrap(), "{}");
    }

    #[test]
    fn test_partial_stiffener_descriptor_is_rejected() {
        let d: StiffenerDescriptor = serde_json::from_str(r#"{ "type": "fb" }"#).unwrap();
        assert_eq!(d.profile(4).unwrap_err().error_code(), "INPUT_SCHEMA");
    }

    #[test]
    fn test_unknown_material_names_the_panel() {
        let json = DEMO.replacen("\"AH36\"", "\"S355\"", 1);
        let err = SectionFile::from_json(&json)
            .unwrap()
            .to_section(&AnalysisSettings::default())
            .unwrap_err();
        match err {
            CsrError::InputSchema { entity, .. } => assert_eq!(entity, "panel 7"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_is_input_error() {
        let json = DEMO.replacen("\"Tsc\": 15.3,", "", 1);
        let err = SectionFile::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_SCHEMA");
    }

    #[test]
    fn test_open_block_is_geometry_error() {
        let mut file = SectionFile::from_json(DEMO).unwrap();
        file.blocks[2].ids.pop();
        let err = file.to_section(&AnalysisSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY_INVARIANT");
    }
}

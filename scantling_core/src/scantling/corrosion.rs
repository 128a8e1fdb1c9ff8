//! Corrosion additions (CSR Pt 1 Ch 3 Sec 3)
//!
//! Each side of a plate takes the one-side allowance of the space it faces:
//!
//! | Space | t_c per side (mm) |
//! |-------|-------------------|
//! | Water ballast, within 3 m of the tank top | 1.7 |
//! | Water ballast, elsewhere | 1.2 |
//! | Dry cargo hold, inner bottom and hopper | 2.0 |
//! | Dry cargo hold, other members | 1.0 |
//! | Sea, atmosphere, liquid cargo | 1.0 |
//! | Oil fuel, fresh water | 0.7 |
//! | Void, or no space modelled | 0.5 |
//!
//! Plate: `t_c = roundup_0.5(t_c1 + t_c2) + 0.5`. Stiffener legs stand in
//! the space on the stiffener side only: `t_c = roundup_0.5(2·t_c1) + 0.5`.
//! Girders carry no corrosion addition.

use serde::{Deserialize, Serialize};

use crate::blocks::{PanelSide, SpaceType};
use crate::geometry::{PlateTag, StiffenedPanel};
use crate::section::ShipSection;
use crate::units::{round_up_half, Millimeters};

/// Band below a ballast tank top with the higher allowance (m)
const WB_TOP_BAND: f64 = 3.0;

/// Allowance of a side with no space modelled
const UNBOUNDED: f64 = 0.5;

/// One-side corrosion allowance (mm)
pub fn side_allowance(space: SpaceType, tag: PlateTag, near_top: bool) -> f64 {
    match space {
        SpaceType::WaterBallast if near_top => 1.7,
        SpaceType::WaterBallast => 1.2,
        SpaceType::DryCargo => match tag {
            PlateTag::InnerBottom | PlateTag::Hopper => 2.0,
            _ => 1.0,
        },
        SpaceType::Sea | SpaceType::Atmosphere | SpaceType::LiquidCargo => 1.0,
        SpaceType::OilTank | SpaceType::FreshWater => 0.7,
        SpaceType::VoidSpace => 0.5,
    }
}

/// Corrosion additions of one panel with the spaces they come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrosionAddition {
    pub panel_id: u32,
    /// Space on the stiffener side
    pub inner: Option<SpaceType>,
    /// Space opposite the stiffeners
    pub outer: Option<SpaceType>,
    pub tc_inner: f64,
    pub tc_outer: f64,
    pub plate: Millimeters,
    pub stiffeners: Millimeters,
}

/// Corrosion additions of a panel from the blocks it bounds
pub fn corrosion_addition(section: &ShipSection, panel: &StiffenedPanel) -> CorrosionAddition {
    let top_of_plate = panel.plate.start.y.max(panel.plate.end.y);
    let mut inner: Option<(SpaceType, f64)> = None;
    let mut outer: Option<(SpaceType, f64)> = None;

    for block in section.blocks_of(panel.id) {
        let near_top = block.z_top() - top_of_plate <= WB_TOP_BAND;
        let tc = side_allowance(block.space, panel.tag(), near_top);
        let slot = match block.side_of(panel.id) {
            Some(PanelSide::Inner) => &mut inner,
            Some(PanelSide::Outer) => &mut outer,
            None => continue,
        };
        if slot.map_or(true, |(_, current)| tc > current) {
            *slot = Some((block.space, tc));
        }
    }

    let tc_inner = inner.map_or(UNBOUNDED, |(_, tc)| tc);
    let tc_outer = outer.map_or(UNBOUNDED, |(_, tc)| tc);
    let (plate, stiffeners) = if panel.tag() == PlateTag::Girder {
        (0.0, 0.0)
    } else {
        (
            round_up_half(tc_inner + tc_outer) + 0.5,
            round_up_half(2.0 * tc_inner) + 0.5,
        )
    };

    CorrosionAddition {
        panel_id: panel.id,
        inner: inner.map(|(space, _)| space),
        outer: outer.map(|(space, _)| space),
        tc_inner,
        tc_outer,
        plate: Millimeters(plate),
        stiffeners: Millimeters(stiffeners),
    }
}

/// Assign the same reduction to every panel ahead of sizing
pub fn assign_placeholder(section: &mut ShipSection, reduction: Millimeters) {
    for panel in section.panels.values_mut() {
        panel.set_corrosion(reduction, reduction);
    }
}

/// Add the full corrosion additions to every sized panel.
///
/// The net thickness of a sized plate is kept, so the as-built thickness
/// grows by the addition.
pub fn apply_corrosion(section: &mut ShipSection) -> Vec<CorrosionAddition> {
    let additions: Vec<CorrosionAddition> = section
        .panels
        .values()
        .map(|panel| corrosion_addition(section, panel))
        .collect();
    for addition in &additions {
        if let Some(panel) = section.panels.get_mut(&addition.panel_id) {
            panel.set_corrosion(addition.plate, addition.stiffeners);
        }
    }
    additions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::tests::box_section;
    use approx::assert_relative_eq;

    #[test]
    fn test_side_allowances() {
        assert_eq!(side_allowance(SpaceType::WaterBallast, PlateTag::Wing, true), 1.7);
        assert_eq!(side_allowance(SpaceType::WaterBallast, PlateTag::Wing, false), 1.2);
        assert_eq!(side_allowance(SpaceType::DryCargo, PlateTag::InnerBottom, false), 2.0);
        assert_eq!(side_allowance(SpaceType::DryCargo, PlateTag::Shell, false), 1.0);
        assert_eq!(side_allowance(SpaceType::OilTank, PlateTag::Shell, false), 0.7);
    }

    #[test]
    fn test_bottom_between_sea_and_hold() {
        let section = box_section();
        let addition = corrosion_addition(&section, &section.panels[&1]);
        assert_eq!(addition.inner, Some(SpaceType::DryCargo));
        assert_eq!(addition.outer, Some(SpaceType::Sea));
        assert_eq!(addition.plate, Millimeters(2.5));
        assert_eq!(addition.stiffeners, Millimeters(2.5));
    }

    #[test]
    fn test_girder_has_no_addition() {
        let section = box_section();
        let addition = corrosion_addition(&section, &section.panels[&4]);
        assert_eq!(addition.plate, Millimeters(0.0));
    }

    #[test]
    fn test_placeholder_then_addition() {
        let mut section = box_section();
        assign_placeholder(&mut section, Millimeters(1.0));
        // unsized: as-built stays, net drops
        let bottom = &section.panels[&1].plate;
        assert_relative_eq!(bottom.as_built_mm().0, 16.0, max_relative = 1e-12);
        assert_relative_eq!(bottom.net_mm().0, 15.0, max_relative = 1e-12);

        let panel = section.panels.get_mut(&1).unwrap();
        panel.plate.thickness.empirical = 0.0129;
        panel.update();
        apply_corrosion(&mut section);
        let bottom = &section.panels[&1].plate;
        assert_relative_eq!(bottom.net_mm().0, 12.9, max_relative = 1e-9);
        assert_relative_eq!(bottom.as_built_mm().0, 15.4, max_relative = 1e-9);
    }
}

//! Block pressures onto panel normals
//!
//! For one pressure case every block slice lying on a panel is turned into a
//! vector pressure `P·n` (n pointing out of the block), resampled at evenly
//! spaced fractions of the plate length, and projected on the plate's own
//! outward normal. Each bounding block keeps its own contribution so that a
//! loading condition can later leave out empty spaces.

use crate::blocks::Block;
use crate::geometry::{BlockPressure, PanelPressure, Point, StiffenedPanel};
use crate::loads::PressureCase;
use crate::section::ShipSection;

/// Evenly spaced sample fractions 0, 1/(n−1), ..., 1
pub fn sample_fractions(n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
}

/// Vector pressure of a block slice as (fraction, P·n) pairs sorted by fraction
fn slice_vectors(block: &Block, panel: &StiffenedPanel, values: &[f64]) -> Vec<(f64, Point)> {
    let grid = block.grid();
    let slice = block.slice(panel.id);
    let mut normal = Point::default();
    let mut samples: Vec<(f64, Point)> = slice
        .iter()
        .filter_map(|&i| {
            let g = grid.get(i)?;
            // the trailing corner belongs to the next segment; keep the slice normal
            if g.owner == Some(panel.id) {
                normal = g.normal;
            }
            let p = values.get(i).copied().unwrap_or(0.0);
            Some((panel.plate.fraction_of(g.point), normal * p))
        })
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    samples
}

fn interpolate(samples: &[(f64, Point)], f: f64) -> Point {
    match samples {
        [] => Point::default(),
        [only] => only.1,
        _ => {
            if f <= samples[0].0 {
                return samples[0].1;
            }
            for pair in samples.windows(2) {
                let ((f0, v0), (f1, v1)) = (pair[0], pair[1]);
                if f <= f1 {
                    let span = f1 - f0;
                    if span <= 0.0 {
                        return v1;
                    }
                    return v0.lerp(v1, (f - f0) / span);
                }
            }
            samples[samples.len() - 1].1
        }
    }
}

/// Projected pressure of one block on one panel, or `None` if the block
/// does not bound the panel.
pub fn project_block(block: &Block, panel: &StiffenedPanel, case: PressureCase, fractions: &[f64]) -> Option<BlockPressure> {
    block.direction_of(panel.id)?;
    let values = match block.pressure.get(&case) {
        Some(v) => v.as_slice(),
        None => {
            log::warn!("block {}: no pressure for case {}, using zero", block.name, case);
            &[]
        }
    };
    let samples = slice_vectors(block, panel, values);
    let projected = fractions
        .iter()
        .map(|&f| interpolate(&samples, f).dot(panel.plate.outward_normal_at(f)))
        .collect();
    Some(BlockPressure {
        block: block.name.clone(),
        space: block.space,
        values: projected,
    })
}

/// Project every block pressure of `case` onto every panel of the section.
pub fn project_case(section: &mut ShipSection, case: PressureCase, panel_samples: usize) {
    let fractions = sample_fractions(panel_samples);
    let ShipSection {
        panels,
        blocks,
        sea,
        atmosphere,
        ..
    } = section;
    for panel in panels.values_mut() {
        let mut pressure = PanelPressure::new(fractions.clone());
        for block in blocks.iter().chain([&*sea, &*atmosphere]) {
            if let Some(contribution) = project_block(block, panel, case, &fractions) {
                pressure.contributions.push(contribution);
            }
        }
        if pressure.contributions.is_empty() {
            log::warn!("panel {} bounds no block", panel.id);
        }
        panel.set_pressure(case, pressure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::SpaceType;
    use crate::pressure::external::hydrostatic;
    use crate::section::tests::box_section;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_fractions() {
        assert_eq!(sample_fractions(3), vec![0.0, 0.5, 1.0]);
        assert_eq!(sample_fractions(0), vec![0.0, 1.0]);
    }

    #[test]
    fn test_sea_pushes_against_the_outward_normal() {
        let mut section = box_section();
        let t = 15.3;
        let values: Vec<f64> = section.sea.grid().iter().map(|g| hydrostatic(1.025, t, g.point.y)).collect();
        section.sea.set_pressure(PressureCase::Static, values);
        project_case(&mut section, PressureCase::Static, 11);

        let bottom = &section.panels[&1].pressure[&PressureCase::Static];
        let sea = bottom.block("SEA").unwrap();
        assert_eq!(sea.space, SpaceType::Sea);
        // sea acts from the unstiffened side
        for v in &sea.values {
            assert_relative_eq!(*v, -hydrostatic(1.025, t, 0.0), max_relative = 1e-9);
        }

        // side shell: linear in z, zero above the waterline
        let side = section.panels[&2].pressure[&PressureCase::Static].block("SEA").unwrap();
        assert_relative_eq!(side.values[0], -hydrostatic(1.025, t, 0.0), max_relative = 1e-9);
        assert_relative_eq!(side.values[10], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hold_pushes_along_the_outward_normal() {
        let mut section = box_section();
        let values = vec![100.0; section.blocks[0].grid().len()];
        section.blocks[0].set_pressure(PressureCase::Static, values);
        project_case(&mut section, PressureCase::Static, 5);
        let deck = section.panels[&3].pressure[&PressureCase::Static].block("HOLD").unwrap();
        for v in &deck.values {
            assert_relative_eq!(*v, 100.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_missing_block_pressure_reads_zero() {
        let mut section = box_section();
        project_case(&mut section, PressureCase::Static, 5);
        let total = section.panels[&1].pressure[&PressureCase::Static].total(&Default::default());
        assert!(total.iter().all(|&v| v == 0.0));
    }
}

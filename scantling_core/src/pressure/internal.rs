//! Internal pressures of tanks and holds (CSR Pt 1 Ch 4 Sec 6)
//!
//! Every function evaluates a whole block grid and returns one pressure per
//! grid point, positive pushing out of the block.

use crate::blocks::{Block, GridPoint, SpaceType};
use crate::loads::LoadCase;
use crate::settings::AnalysisSettings;
use crate::units::{G, RHO_SEA};

/// Full-tank factors (f_full-l, f_full-t) of the dynamic liquid pressure
fn full_tank_factors(space: SpaceType) -> (f64, f64) {
    match space {
        SpaceType::LiquidCargo => (0.62, 0.67),
        _ => (1.0, 1.0),
    }
}

/// Static pressure of the block contents
pub fn static_pressure(block: &Block, settings: &AnalysisSettings) -> Vec<f64> {
    let z_top = block.z_top();
    let rho = block.density;
    let grid = block.grid();
    match block.space {
        SpaceType::WaterBallast | SpaceType::OilTank | SpaceType::FreshWater => {
            let head = z_top + settings.air_pipe_height / 2.0;
            grid.iter()
                .map(|g| rho.max(RHO_SEA) * G * (head - g.point.y))
                .collect()
        }
        SpaceType::LiquidCargo => grid
            .iter()
            .map(|g| rho.max(RHO_SEA) * G * (z_top - g.point.y) + settings.vapour_pressure)
            .collect(),
        SpaceType::DryCargo => grid
            .iter()
            .map(|g| {
                if g.point.y <= z_top {
                    G * rho.max(1.0) * g.k_c * (z_top - g.point.y)
                } else {
                    0.0
                }
            })
            .collect(),
        SpaceType::VoidSpace | SpaceType::Sea | SpaceType::Atmosphere => vec![0.0; grid.len()],
    }
}

/// Grid point maximising V = a_x(x − x_G) + a_y(y − y_G) + (a_z + g)(z − z_G)
fn reference_point<'a>(grid: &'a [GridPoint], centroid: [f64; 3], a: [f64; 3], x: f64) -> Option<&'a GridPoint> {
    let [x_g, y_g, z_g] = centroid;
    let v = |g: &GridPoint| a[0] * (x - x_g) + a[1] * (g.point.x - y_g) + (a[2] + G) * (g.point.y - z_g);
    grid.iter().max_by(|p, q| v(p).total_cmp(&v(q)))
}

/// Dynamic pressure of the block contents under one EDW
pub fn dynamic_pressure(block: &Block, case: &LoadCase) -> Vec<f64> {
    let grid = block.grid();
    let x = case.particulars.l_sc / 2.0;
    let centroid = block.centroid_3d(case.particulars.l_sc);
    let [x_g, y_g, _] = centroid;
    let a = case.acceleration_at(centroid[0], centroid[1], centroid[2]);
    let f_beta = case.f_beta();

    match block.space {
        SpaceType::WaterBallast | SpaceType::LiquidCargo | SpaceType::OilTank | SpaceType::FreshWater => {
            let rho = block.density.max(RHO_SEA);
            let (f_l, f_t) = full_tank_factors(block.space);
            let Some(reference) = reference_point(grid, centroid, a, x) else {
                return Vec::new();
            };
            // the reference point lies in the section plane
            let (x_0, y_0, z_0) = (x, reference.point.x, reference.point.y);
            grid.iter()
                .map(|g| {
                    f_beta
                        * rho
                        * (a[2] * (z_0 - g.point.y) + f_l * a[0] * (x_0 - x) + f_t * a[1] * (y_0 - g.point.x))
                })
                .collect()
        }
        SpaceType::DryCargo => {
            let z_c = block.z_top();
            grid.iter()
                .map(|g| {
                    if g.point.y <= z_c {
                        f_beta
                            * block.density
                            * (g.k_c * a[2] * (z_c - g.point.y)
                                + 0.25 * a[0] * (x_g - x)
                                + 0.25 * a[1] * (y_g - g.point.x))
                    } else {
                        0.0
                    }
                })
                .collect()
        }
        SpaceType::VoidSpace | SpaceType::Sea | SpaceType::Atmosphere => vec![0.0; grid.len()],
    }
}

//! Longitudinal stiffeners (CSR Pt 1 Ch 6 Sec 5)
//!
//! ## Requirements
//!
//! | Check | Formula |
//! |-------|---------|
//! | Web shear | t_w = f_shr·\|P\|·s·ℓ / (d_shr·C_t·τ_eH), f_shr = 0.5 |
//! | Web slenderness | h_w / t_w ≤ C_w·√(235/R_eH) |
//! | Flange slenderness | b_f-out / t_f ≤ C_f·√(235/R_eH), C_f = 12 |
//! | Bending | Z = \|P\|·s·ℓ² / (f_bdg·C_s·R_eH), f_bdg = 12 |
//!
//! `s` in mm, `ℓ` the PSM spacing in m, Z in cm³ including the attached
//! plate of effective breadth b_eff.
//!
//! When the net section modulus falls short, web and flange are thickened
//! together in 0.5 mm steps up to twice the net plate thickness.

use serde::{Deserialize, Serialize};

use super::minimum::LegLimits;
use crate::errors::CsrError;
use crate::geometry::{Plate, Point, StiffenedPanel, StiffenerForm, ThicknessBasis};
use crate::pressure::DesignPressure;
use crate::settings::Acceptance;
use crate::units::{CubicCentimeters, Meters, Millimeters};

const F_SHR: f64 = 0.5;
const F_BDG: f64 = 12.0;
const C_F: f64 = 12.0;
const STEP_MM: f64 = 0.5;

/// Web slenderness coefficient C_w
pub fn c_w(form: StiffenerForm) -> f64 {
    match form {
        StiffenerForm::Angle | StiffenerForm::TBar => 65.0,
        StiffenerForm::BulbBar => 45.0,
        StiffenerForm::FlatBar => 22.0,
    }
}

/// Shear coefficient C_t
pub fn c_t(acceptance: Acceptance) -> f64 {
    match acceptance {
        Acceptance::Static => 0.75,
        Acceptance::StaticDynamic => 0.9,
    }
}

/// Bending coefficient C_s; zero or negative when the hull girder stress
/// leaves no capacity for local bending
pub fn c_s(sigma_hg: f64, r_eh: f64, acceptance: Acceptance) -> f64 {
    let c_s_max = match acceptance {
        Acceptance::Static => 0.85,
        Acceptance::StaticDynamic => 1.0,
    };
    (1.0 - sigma_hg.abs() / r_eh).min(c_s_max)
}

/// Net web thickness for shear, with `d_shr_mm` the effective shear depth
pub fn shear_thickness(p: f64, spacing_mm: f64, span: f64, d_shr_mm: f64, c_t: f64, tau_eh: f64) -> Millimeters {
    if d_shr_mm <= 0.0 {
        return Millimeters(0.0);
    }
    Millimeters(F_SHR * p.abs() * spacing_mm * span / (d_shr_mm * c_t * tau_eh))
}

/// Minimum leg thickness for a slenderness ratio `c·√(235/R_eH)`
pub fn slenderness_thickness(depth_mm: f64, c: f64, r_eh: f64) -> Millimeters {
    Millimeters(depth_mm / (c * (235.0 / r_eh).sqrt()))
}

/// Required net section modulus with attached plate (cm³).
///
/// Zero when `c_s` leaves no capacity; that case is reported on its own.
pub fn required_modulus(p: f64, spacing_mm: f64, span: f64, c_s: f64, r_eh: f64) -> CubicCentimeters {
    if c_s <= 0.0 {
        return CubicCentimeters(0.0);
    }
    CubicCentimeters(p.abs() * spacing_mm * span * span / (F_BDG * c_s * r_eh))
}

/// Outcome of sizing the stiffeners of one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StiffenerResult {
    /// Governing stiffener root as a fraction of the plate length
    pub fraction: f64,
    /// Pressure at the governing root (kPa)
    pub pressure: f64,
    pub sigma_hg: f64,
    pub c_s: f64,
    pub z_rule: CubicCentimeters,
    /// Net section modulus with attached plate after sizing
    pub z_actual: CubicCentimeters,
    pub t_shear: Millimeters,
    pub t_web_slenderness: Millimeters,
    pub t_flange_slenderness: Millimeters,
    pub violations: Vec<CsrError>,
}

impl StiffenerResult {
    pub fn is_satisfied(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Raise the rule requirements of a leg, never lowering an earlier one.
fn require(leg: &mut Plate, calculated: Millimeters, empirical: Millimeters) {
    let calculated: Meters = calculated.into();
    let empirical: Meters = empirical.into();
    leg.thickness.calculated = leg.thickness.calculated.max(calculated.0);
    leg.thickness.empirical = leg.thickness.empirical.max(empirical.0);
    leg.update();
}

/// Size the stiffeners of a panel against its design pressure.
///
/// Every stiffener of the panel shares one profile, so the root with the
/// largest pressure governs them all. The base plate must already carry its
/// updated net thickness. Returns `None` for an unstiffened panel.
pub fn size_stiffeners<F>(
    panel: &mut StiffenedPanel,
    design: &DesignPressure,
    l_sc: f64,
    sigma_hg: F,
) -> Option<StiffenerResult>
where
    F: Fn(Point) -> f64,
{
    let profile = panel.profile?;
    if panel.stiffeners.is_empty() {
        return None;
    }

    let (fraction, pressure) = panel
        .root_fractions()
        .iter()
        .map(|&f| (f, design.at(f)))
        .fold((0.0, 0.0), |acc: (f64, f64), (f, p)| if p.abs() > acc.1.abs() { (f, p) } else { acc });
    let sigma = sigma_hg(panel.plate.point_at(fraction));

    let material = profile.material.properties();
    let acceptance = design.dynamics.acceptance();
    let spacing_mm = panel.layout.spacing_mm;
    let span = panel.span();
    let plate_net = panel.plate.net_mm();
    let b_eff_mm = panel.effective_breadth() * 1000.0;
    let limits = LegLimits::new(l_sc, plate_net);
    let id = panel.id;
    let mut violations = Vec::new();

    let lw = profile.dimensions.lw;
    let d_shr = lw + plate_net.0 / 2.0;
    let t_shear = shear_thickness(pressure, spacing_mm, span, d_shr, c_t(acceptance), material.tau_eh);
    let t_web_slenderness = slenderness_thickness(lw, c_w(profile.form), material.r_eh);

    let web_required = t_shear.0.max(t_web_slenderness.0).max(limits.minimum.0);
    if web_required > limits.maximum.0 {
        violations.push(CsrError::panel_violation(
            id,
            "Pt 1 Ch 6 Sec 5 [1.2]",
            format!(
                "web needs {:.1} mm net, above the limit of {:.1} mm",
                web_required, limits.maximum.0
            ),
        ));
    }
    let web_calculated = limits.clamp(t_shear);
    let web_empirical = limits.clamp(Millimeters(t_web_slenderness.0.max(limits.minimum.0)));
    for s in &mut panel.stiffeners {
        require(s.web_mut(), web_calculated, web_empirical);
    }

    let mut t_flange_slenderness = Millimeters(0.0);
    if profile.form.has_flange() {
        let web_net = panel.stiffeners[0].web().net_mm().0;
        let (lf, _) = profile.dimensions.flange();
        let outstand = match profile.form {
            StiffenerForm::Angle => lf - web_net,
            _ => (lf - web_net) / 2.0,
        };
        t_flange_slenderness = slenderness_thickness(outstand.max(0.0), C_F, material.r_eh);
        let flange_empirical = limits.clamp(Millimeters(t_flange_slenderness.0.max(limits.minimum.0)));
        for s in &mut panel.stiffeners {
            if let Some(flange) = s.flange_mut() {
                require(flange, Millimeters(0.0), flange_empirical);
            }
        }
    }

    let c_s = c_s(sigma, material.r_eh, acceptance);
    let z_rule = required_modulus(pressure, spacing_mm, span, c_s, material.r_eh);
    let modulus = |panel: &StiffenedPanel| {
        panel.stiffeners[0].z_with_attached_plate(plate_net.0, b_eff_mm, ThicknessBasis::Net)
    };
    let mut z_actual = modulus(panel);

    if c_s <= 0.0 {
        violations.push(CsrError::panel_violation(
            id,
            "Pt 1 Ch 6 Sec 5 [1.1]",
            format!(
                "hull girder stress {:.1} N/mm² leaves no bending capacity (C_s = {:.3})",
                sigma, c_s
            ),
        ));
    } else {
        while z_actual.0 < z_rule.0 {
            let web_net = panel.stiffeners[0].web().net_mm().0;
            if web_net + 1.0e-9 >= limits.maximum.0 {
                break;
            }
            for s in &mut panel.stiffeners {
                let raised = limits.clamp(Millimeters(s.web().net_mm().0 + STEP_MM));
                require(s.web_mut(), raised, Millimeters(0.0));
                if let Some(flange) = s.flange_mut() {
                    let raised = limits.clamp(Millimeters(flange.net_mm().0 + STEP_MM));
                    require(flange, raised, Millimeters(0.0));
                }
            }
            z_actual = modulus(panel);
        }
        if z_actual.0 < z_rule.0 {
            violations.push(CsrError::panel_violation(
                id,
                "Pt 1 Ch 6 Sec 5 [1.1]",
                format!(
                    "net Z = {:.1} cm³ below required {:.1} cm³ with legs at {:.1} mm",
                    z_actual.0, z_rule.0, limits.maximum.0
                ),
            ));
        }
    }

    for s in &mut panel.stiffeners {
        s.z_rule = z_rule.0;
    }

    Some(StiffenerResult {
        fraction,
        pressure,
        sigma_hg: sigma,
        c_s,
        z_rule,
        z_actual,
        t_shear,
        t_web_slenderness,
        t_flange_slenderness,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PlateTag;
    use crate::loads::Edw;
    use crate::section::tests::panel;
    use crate::settings::Dynamics;
    use approx::assert_relative_eq;

    fn uniform(p: f64) -> DesignPressure {
        DesignPressure {
            panel_id: 1,
            condition: "Full Load".into(),
            edw: Edw::HSM_1,
            dynamics: Dynamics::Static,
            fractions: vec![0.0, 1.0],
            values: vec![p, p],
            peak: p,
        }
    }

    #[test]
    fn test_shear_thickness() {
        let t = shear_thickness(-200.0, 800.0, 3.6, 307.5, 0.75, 315.0 / 3.0_f64.sqrt());
        let expected = 0.5 * 200.0 * 800.0 * 3.6 / (307.5 * 0.75 * 315.0 / 3.0_f64.sqrt());
        assert_relative_eq!(t.0, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_slenderness_by_form() {
        assert!(c_w(StiffenerForm::FlatBar) < c_w(StiffenerForm::BulbBar));
        let t = slenderness_thickness(300.0, 22.0, 235.0);
        assert_relative_eq!(t.0, 300.0 / 22.0, max_relative = 1e-12);
    }

    #[test]
    fn test_c_s_limits() {
        assert_relative_eq!(c_s(0.0, 315.0, Acceptance::Static), 0.85);
        assert_relative_eq!(c_s(0.0, 315.0, Acceptance::StaticDynamic), 1.0);
        assert!(c_s(400.0, 315.0, Acceptance::StaticDynamic) < 0.0);
    }

    #[test]
    fn test_modulus_is_met_by_raising_legs() {
        let mut p = panel(1, (0.0, 0.0), (4.0, 0.0), 15.0, PlateTag::Shell);
        let result = size_stiffeners(&mut p, &uniform(-200.0), 180.0, |_| 0.0).unwrap();
        assert!(result.is_satisfied(), "{:?}", result.violations);
        assert!(result.z_actual.0 >= result.z_rule.0);
        assert_relative_eq!(result.z_rule.0, 200.0 * 800.0 * 3.6 * 3.6 / (12.0 * 0.85 * 315.0), max_relative = 1e-12);
        for s in &p.stiffeners {
            assert_relative_eq!(s.z_rule, result.z_rule.0);
            assert!(s.web().thickness.is_sized());
            assert!(s.web().net_mm().0 >= 6.2 - 1e-9);
        }
    }

    #[test]
    fn test_overloaded_stiffener_is_reported() {
        let mut p = panel(1, (0.0, 0.0), (4.0, 0.0), 15.0, PlateTag::Shell);
        let result = size_stiffeners(&mut p, &uniform(-2000.0), 180.0, |_| 0.0).unwrap();
        assert!(!result.is_satisfied());
        assert!(result.violations.iter().all(|v| !v.is_fatal()));
        assert_relative_eq!(p.stiffeners[0].web().net_mm().0, 30.0, max_relative = 1e-9);
    }

    #[test]
    fn test_hull_girder_stress_above_yield() {
        let mut p = panel(1, (0.0, 0.0), (4.0, 0.0), 15.0, PlateTag::Shell);
        let result = size_stiffeners(&mut p, &uniform(-100.0), 180.0, |_| 400.0).unwrap();
        assert!(result.c_s < 0.0);
        assert_eq!(result.violations.len(), 1);
    }

    #[test]
    fn test_unstiffened_panel() {
        let mut p = panel(4, (0.0, 22.0), (0.0, 0.0), 12.0, PlateTag::Girder);
        assert!(size_stiffeners(&mut p, &uniform(-100.0), 180.0, |_| 0.0).is_none());
    }
}

use tlwall::prelude::*;

fn shell(backing: MaterialModel) -> Result<Wall, ImpedanceError> {
    // 2 mm of copper, b = 25 mm, L = 1 m.
    Wall::new(
        0.025,
        1.0,
        vec![
            Layer::new(2.0e-3, MaterialProperties::conductor(5.9e7)),
            Layer::semi_infinite(backing),
        ],
    )
}

fn main() -> Result<(), ImpedanceError> {
    let vacuum = shell(MaterialProperties::vacuum().into())?;
    let pec = shell(MaterialModel::PerfectConductor)?;

    // 1 kHz .. 1 GHz, 7 points per decade
    let grid = FrequencyGrid::logspace_hz(1.0e3, 1.0e9, 43)?;
    let modes = [Mode::LONGITUDINAL, Mode::DIPOLE];
    let open = ImpedanceCalculator::new(&vacuum, ChamberShape::Circular).sweep(&grid, &modes)?;
    let shorted = ImpedanceCalculator::new(&pec, ChamberShape::Circular).sweep(&grid, &modes)?;

    let z_open = open.spectrum(Mode::LONGITUDINAL, Plane::Longitudinal)?;
    let z_shorted = shorted.spectrum(Mode::LONGITUDINAL, Plane::Longitudinal)?;
    let x_open = open.spectrum(Mode::DIPOLE, Plane::DrivingX)?;
    let x_shorted = shorted.spectrum(Mode::DIPOLE, Plane::DrivingX)?;

    println!(
        "f(Hz), Zl_vac_re(ohm), Zl_vac_im(ohm), Zl_pec_re(ohm), Zl_pec_im(ohm), \
         Zx_vac_re(ohm/m), Zx_vac_im(ohm/m), Zx_pec_re(ohm/m), Zx_pec_im(ohm/m)"
    );
    for (k, omega) in grid.omegas().iter().enumerate() {
        let (a, b) = (z_open.values()[k], z_shorted.values()[k]);
        let (c, d) = (x_open.values()[k], x_shorted.values()[k]);
        println!(
            "{:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.6e}, {:.6e}",
            frequency_from_angular(*omega),
            a.re,
            a.im,
            b.re,
            b.im,
            c.re,
            c.im,
            d.re,
            d.im
        );
    }
    Ok(())
}

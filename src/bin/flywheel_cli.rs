use clap::{Args, Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;
use std::error::Error;

use flywheel_ballistics::{
    run_dispersion, shot_force_magnitude, DispersionParams, FlightResult, FlightSolver,
    LauncherParameters, PhysicalConstants,
};
use flywheel_ballistics::units::rpm_to_rad_per_s;

#[derive(Parser)]
#[command(name = "flywheel")]
#[command(version = "0.1.0")]
#[command(about = "Flight calculator for flywheel-launched spinning balls", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct LauncherArgs {
    /// Flywheel speed (RPM)
    #[arg(short = 'r', long, default_value = "4000.0")]
    rpm: f64,

    /// Bottom wheel radius (m)
    #[arg(long, default_value = "0.05")]
    bottom_wheel_radius: f64,

    /// Top wheel speed ratio relative to the bottom wheel
    #[arg(short = 'g', long, default_value = "1.0")]
    gear_ratio: f64,

    /// Top wheel radius (m)
    #[arg(long, default_value = "0.05")]
    top_wheel_radius: f64,

    /// Fraction of wheel surface speed transferred to the ball
    #[arg(short = 'e', long, default_value = "0.8")]
    transfer_efficiency: f64,

    /// Ball mass (kg)
    #[arg(short = 'm', long, default_value = "0.045")]
    ball_mass: f64,

    /// Ball compression between the wheels (m)
    #[arg(long, default_value = "0.01")]
    compression: f64,

    /// Compression-to-pulse-width scaling
    #[arg(long, default_value = "0.5")]
    compression_ratio: f64,

    /// Ball-wheel contact duration (s)
    #[arg(long, default_value = "0.02")]
    contact_time: f64,
}

impl LauncherArgs {
    fn to_parameters(&self) -> LauncherParameters {
        LauncherParameters {
            transfer_efficiency: self.transfer_efficiency,
            ball_mass: self.ball_mass,
            shooter_rpm: self.rpm,
            bottom_wheel_radius: self.bottom_wheel_radius,
            gear_ratio: self.gear_ratio,
            top_wheel_radius: self.top_wheel_radius,
            compression: self.compression,
            compression_ratio: self.compression_ratio,
            contact_time: self.contact_time,
        }
    }
}

#[derive(Args, Clone)]
struct AimArgs {
    /// Turret angle (degrees, 0 = +x in the floor plane)
    #[arg(short = 't', long, default_value = "0.0")]
    turret: f64,

    /// Hood elevation above horizontal (degrees)
    #[arg(long, default_value = "45.0")]
    hood: f64,

    /// Ball backspin (RPM)
    #[arg(short = 's', long, default_value = "0.0")]
    spin_rpm: f64,

    /// Launch height above the floor (m)
    #[arg(long, default_value = "0.5")]
    launch_height: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full flight from launch to the ground plane
    Trajectory {
        #[command(flatten)]
        launcher: LauncherArgs,

        #[command(flatten)]
        aim: AimArgs,

        /// Ball radius (m)
        #[arg(long, default_value = "0.02135")]
        ball_radius: f64,

        /// Air density (kg/m^3)
        #[arg(long, default_value = "1.225")]
        air_density: f64,

        /// Drag coefficient
        #[arg(long, default_value = "0.47")]
        drag_coefficient: f64,

        /// Magnus coefficient
        #[arg(long, default_value = "0.1")]
        magnus_coefficient: f64,

        /// Integration timestep (s)
        #[arg(long, default_value = "0.001")]
        time_step: f64,

        /// Flight time cap (s)
        #[arg(long, default_value = "10.0")]
        max_flight_time: f64,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,

        /// Show every trajectory point instead of a sampled table
        #[arg(long)]
        full: bool,
    },

    /// Sample the shot-force profile over the contact window
    ShotProfile {
        #[command(flatten)]
        launcher: LauncherArgs,

        /// Number of samples across the contact window
        #[arg(short = 'n', long, default_value = "50")]
        samples: usize,
    },

    /// Run a shot-to-shot dispersion analysis
    MonteCarlo {
        #[command(flatten)]
        launcher: LauncherArgs,

        #[command(flatten)]
        aim: AimArgs,

        /// Number of simulated shots
        #[arg(short = 'n', long, default_value = "1000")]
        num_sims: usize,

        /// Flywheel speed standard deviation (RPM)
        #[arg(long, default_value = "25.0")]
        rpm_std: f64,

        /// Hood angle standard deviation (degrees)
        #[arg(long, default_value = "0.25")]
        hood_std: f64,

        /// Turret angle standard deviation (degrees)
        #[arg(long, default_value = "0.25")]
        turret_std: f64,

        /// Transfer efficiency standard deviation
        #[arg(long, default_value = "0.01")]
        efficiency_std: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Trajectory {
            launcher,
            aim,
            ball_radius,
            air_density,
            drag_coefficient,
            magnus_coefficient,
            time_step,
            max_flight_time,
            output,
            full,
        } => {
            let params = launcher.to_parameters();
            let constants = PhysicalConstants {
                ball_mass: launcher.ball_mass,
                ball_radius,
                air_density,
                drag_coefficient,
                magnus_coefficient,
                time_step,
                ..PhysicalConstants::default()
            };

            let mut solver = FlightSolver::new(params.clone(), constants)?;
            solver.set_aim(aim.turret, aim.hood);
            solver.set_spin_rate(rpm_to_rad_per_s(aim.spin_rpm));
            solver.set_initial_position(Vector3::new(0.0, 0.0, aim.launch_height));
            solver.set_max_flight_time(max_flight_time);

            let result = solver.solve()?;

            match output {
                OutputFormat::Table => print_trajectory_table(&params, &result, full),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Csv => print_trajectory_csv(&result, full),
            }
        }

        Commands::ShotProfile { launcher, samples } => {
            let params = launcher.to_parameters();
            params.validate()?;
            print_shot_profile(&params, samples);
        }

        Commands::MonteCarlo {
            launcher,
            aim,
            num_sims,
            rpm_std,
            hood_std,
            turret_std,
            efficiency_std,
        } => {
            let params = launcher.to_parameters();
            let constants = PhysicalConstants {
                ball_mass: launcher.ball_mass,
                time_step: 0.001,
                ..PhysicalConstants::default()
            };

            let dispersion = DispersionParams {
                num_simulations: num_sims,
                rpm_std_dev: rpm_std,
                hood_angle_std_dev: hood_std,
                turret_angle_std_dev: turret_std,
                efficiency_std_dev: efficiency_std,
            };

            let results = run_dispersion(
                &params,
                &constants,
                aim.turret,
                aim.hood,
                rpm_to_rad_per_s(aim.spin_rpm),
                Vector3::new(0.0, 0.0, aim.launch_height),
                &dispersion,
            )?;

            print_dispersion_summary(&results, num_sims);
        }
    }

    Ok(())
}

fn print_trajectory_table(params: &LauncherParameters, result: &FlightResult, full: bool) {
    println!("=== TRAJECTORY ===");
    println!();
    println!("Muzzle velocity:  {:.2} m/s", params.muzzle_velocity());
    println!("Total impulse:    {:.4} N*s", params.total_impulse());
    println!();
    println!("Range:            {:.2} m", result.max_range);
    println!("Max height:       {:.2} m", result.max_height);
    println!("Time of flight:   {:.3} s", result.time_of_flight);
    println!("Impact velocity:  {:.2} m/s", result.impact_velocity);
    println!("Impact energy:    {:.2} J", result.impact_energy);
    println!();
    println!("  Time (s) |   X (m)  |   Y (m)  |   Z (m)  | Velocity (m/s)");
    println!("  ---------|----------|----------|----------|---------------");

    // Sampled view unless the caller asked for every point
    let stride = if full {
        1
    } else {
        (result.points.len() / 20).max(1)
    };
    for point in result.points.iter().step_by(stride) {
        println!(
            "  {:8.3} | {:8.3} | {:8.3} | {:8.3} | {:8.2}",
            point.time, point.position.x, point.position.y, point.position.z,
            point.velocity_magnitude
        );
    }
}

fn print_trajectory_csv(result: &FlightResult, full: bool) {
    println!("time_s,x_m,y_m,z_m,velocity_mps,energy_j");
    let stride = if full {
        1
    } else {
        (result.points.len() / 100).max(1)
    };
    for point in result.points.iter().step_by(stride) {
        println!(
            "{},{},{},{},{},{}",
            point.time,
            point.position.x,
            point.position.y,
            point.position.z,
            point.velocity_magnitude,
            point.kinetic_energy
        );
    }
}

fn print_shot_profile(params: &LauncherParameters, samples: usize) {
    let samples = samples.max(2);
    let dt = params.contact_time / (samples - 1) as f64;

    println!("=== SHOT FORCE PROFILE ===");
    println!();
    println!("Muzzle velocity:  {:.2} m/s", params.muzzle_velocity());
    println!("Target impulse:   {:.4} N*s", params.total_impulse());
    println!();
    println!("  Time (ms) | Force (N)");
    println!("  ----------|----------");

    for i in 0..samples {
        let t = i as f64 * dt;
        println!(
            "  {:9.3} | {:8.2}",
            t * 1000.0,
            shot_force_magnitude(params, t)
        );
    }

    // Midpoint-rule check that the shaped profile carries the full impulse
    let n = 10_000;
    let fine_dt = params.contact_time / n as f64;
    let integral: f64 = (0..n)
        .map(|i| shot_force_magnitude(params, (i as f64 + 0.5) * fine_dt) * fine_dt)
        .sum();
    println!();
    println!("Integrated impulse: {:.4} N*s", integral);
}

fn print_dispersion_summary(results: &flywheel_ballistics::DispersionResults, requested: usize) {
    let lateral_std = {
        let values: Vec<f64> = results.impact_deviations.iter().map(|d| d.y).collect();
        std_dev(&values)
    };
    let range_dev_std = {
        let values: Vec<f64> = results.impact_deviations.iter().map(|d| d.x).collect();
        std_dev(&values)
    };

    println!("=== DISPERSION ===");
    println!();
    println!("Shots solved:        {} of {}", results.ranges.len(), requested);
    println!("Mean range:          {:.3} m", results.mean_range());
    println!("Range std dev:       {:.3} m", results.range_std_dev());
    println!("Down-range scatter:  {:.3} m (1 sigma)", range_dev_std);
    println!("Lateral scatter:     {:.3} m (1 sigma)", lateral_std);
    println!(
        "Mean impact velocity: {:.2} m/s",
        results.impact_velocities.iter().sum::<f64>() / results.impact_velocities.len() as f64
    );
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

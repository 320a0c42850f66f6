//! Simulated dividing-head example.
//!
//! Demonstrates loading a configuration, planning a move profile, and
//! stepping a simulated spindle through every entry of a division table.
//!
//! The simulated motor runs against the wall clock, so the example takes a
//! few seconds of real time.

use dividing_head::{
    clock::SystemClock,
    config::units::{Degrees, DegreesPerSec},
    controller::{MotionController, MotionState, TargetMode},
    motion::MotionProfile,
    motor::{Motor, SimulatedMotor},
    parse_config,
};

fn main() {
    println!("=== Simulated Dividing Head ===\n");

    // 40:1 worm, 200 step motor at 8 microsteps = 64000 steps per revolution
    let toml_content = r#"
[Mechanical]
motor_revs_per_spindle_rev = 40.0
motor_fullsteps_per_rev = 200
motor_microsteps_per_fullstep = 8

[Motor]
max_current = 1200
start_speed = 2.0
min_speed = 5.0
max_speed = 120.0
default_speed = 60.0
acceleration = 120.0
"#;

    let config = parse_config(toml_content).expect("Failed to parse config");
    println!("Steps per revolution: {}", config.steps_per_revolution());

    let mut controller = MotionController::new(SimulatedMotor::new(SystemClock::new()), &config)
        .expect("Failed to set up controller");

    // Show what a single 60 degree move looks like
    let constraints = controller.constraints().clone();
    let profile = MotionProfile::plan(
        controller
            .anchor()
            .relative_steps(Degrees(60.0))
            .expect("Angle out of range") as f64,
        constraints.start_speed_steps_per_sec,
        constraints.acceleration_steps_per_sec2,
        constraints.velocity_to_steps(controller.speed()),
    )
    .expect("Failed to plan profile");

    println!("\n=== Motion Profile (60 deg) ===");
    println!("Top speed: {:.0} steps/s", profile.top_speed);
    println!("Accelerating until: {:.3} s ({:.0} steps)", profile.t1, profile.d1);
    println!("Cruising until: {:.3} s ({:.0} steps)", profile.t2, profile.d2);
    println!("Complete at: {:.3} s ({:.0} steps)", profile.t3, profile.d3);
    println!("Triangular: {}", if profile.is_triangular() { "yes" } else { "no" });

    println!("\n=== Division Run ===");
    controller.power().expect("Failed to power on");
    controller.set_speed(DegreesPerSec(90.0)).expect("Failed to set speed");
    controller
        .set_division(6, Degrees(0.0), Degrees(360.0))
        .expect("Failed to set divisions");
    controller
        .set_target_mode(TargetMode::Division)
        .expect("Failed to select division mode");

    let divisions: Vec<Degrees> = controller.divs().to_vec();
    println!("Divisions: {:?}", divisions.iter().map(|d| d.0).collect::<Vec<_>>());

    for index in 0..divisions.len() {
        controller.set_target(index as f64).expect("Failed to select division");
        let (angle, _) = controller.div_target();

        if controller.motion_state() == MotionState::Idle {
            println!("Division {} ({:.1} deg): already there", index, angle.0);
            continue;
        }

        println!(
            "Division {} ({:.1} deg): register {} -> {}",
            index,
            angle.0,
            controller.motor().position(),
            controller.target_register()
        );
        controller.start_stop().expect("Failed to start move");

        while controller.motion_state().is_in_motion() {
            std::thread::sleep(controller.poll_interval());
            controller.periodic().expect("Motor fault");

            let (moving, percent) = controller.progress();
            if moving {
                println!("  {:>6.2} deg  {:>3}%", controller.position_angle().0, percent);
            }
        }

        println!(
            "  arrived at {:.2} deg, state {}",
            controller.position_angle().0,
            controller.motion_state().name()
        );
    }

    println!("\n=== Example Complete ===");
}

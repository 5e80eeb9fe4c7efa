#![allow(unused)]

use std::fmt::Write;

use droid_pp::Beatmap;

/// Bit values for mods
pub mod mods {
    pub const NM: u32 = 0;
    pub const NF: u32 = 1 << 0;
    pub const HD: u32 = 1 << 3;
    pub const HR: u32 = 1 << 4;
    pub const DT: u32 = 1 << 6;
    pub const RX: u32 = 1 << 7;
    pub const HT: u32 = 1 << 8;
    pub const FL: u32 = 1 << 10;
}

const HEADER: &str = "osu file format v14

[General]
StackLeniency: 0.7
Mode: 0

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:8
ApproachRate:9
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,400,4,2,0,100,1,0

[HitObjects]
";

fn parse(hit_objects: &str) -> Beatmap {
    let content = format!("{HEADER}{hit_objects}");

    content.parse().expect("inline map must decode")
}

/// Circles in a short zig-zag, `spacing_ms` apart.
pub fn stream(count: usize, spacing_ms: f64) -> Beatmap {
    let mut hit_objects = String::new();

    for i in 0..count {
        let x = 180 + 40 * (i % 4);
        let y = if i % 2 == 0 { 170 } else { 210 };
        let time = 1000.0 + spacing_ms * i as f64;

        let _ = writeln!(hit_objects, "{x},{y},{time},1,0,0:0:0:0:");
    }

    parse(&hit_objects)
}

/// Circles alternating between both sides of the playfield.
pub fn jumps(count: usize, spacing_ms: f64) -> Beatmap {
    let mut hit_objects = String::new();

    for i in 0..count {
        let x = if i % 2 == 0 { 64 } else { 448 };
        let y = 96 + 48 * (i % 5);
        let time = 1000.0 + spacing_ms * i as f64;

        let _ = writeln!(hit_objects, "{x},{y},{time},1,0,0:0:0:0:");
    }

    parse(&hit_objects)
}

/// Sliders alternating between both sides of the playfield.
pub fn sliders(count: usize) -> Beatmap {
    let mut hit_objects = String::new();

    for i in 0..count {
        let x = if i % 2 == 0 { 64 } else { 320 };
        let y = 96 + 40 * (i % 5);
        let time = 1000 + 600 * i;

        let _ = writeln!(
            hit_objects,
            "{x},{y},{time},2,0,L|{}:{},1,140",
            x + 140,
            y
        );
    }

    parse(&hit_objects)
}

/// Circles and sliders with a spinner in the middle.
pub fn mixed() -> Beatmap {
    let mut hit_objects = String::new();
    let mut time = 1000;

    for i in 0..48 {
        let x = 100 + 25 * (i % 12);
        let y = 100 + 30 * (i % 7);

        if i % 3 == 0 {
            let _ = writeln!(
                hit_objects,
                "{x},{y},{time},2,0,B|{}:{}|{}:{},1,140",
                x + 60,
                y + 40,
                x + 140,
                y
            );
            time += 600;
        } else {
            let _ = writeln!(hit_objects, "{x},{y},{time},1,0,0:0:0:0:");
            time += 200;
        }

        if i == 23 {
            let _ = writeln!(hit_objects, "256,192,{time},12,0,{}", time + 2000);
            time += 2400;
        }
    }

    parse(&hit_objects)
}

/// Jumps that are too far apart to ever be on screen together.
pub fn sparse(count: usize) -> Beatmap {
    jumps(count, 800.0)
}

/// Content of a map whose slider has a negative repeat count.
pub fn negative_repeats() -> String {
    format!(
        "{HEADER}100,100,1000,1,0,0:0:0:0:\n\
        200,100,1500,2,0,L|300:100,-1,100\n\
        300,100,2000,1,0,0:0:0:0:\n"
    )
}

/// Print calculator logs with `RUST_LOG=droid_pp=debug`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

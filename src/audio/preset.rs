/// One stage of a preset's effect chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectStep {
    /// Reverberation. `reverberance` and `room_scale` are percentages, `wet_gain_db` in dB.
    Reverb {
        reverberance: f32,
        room_scale: f32,
        wet_gain_db: f32,
    },
    /// Pitch shift without tempo change.
    Pitch { cents: f32 },
    HighPass { hz: f32 },
    LowPass { hz: f32 },
    Gain { db: f32 },
    Reverse,
    Chorus {
        in_gain: f32,
        out_gain: f32,
        delay_ms: f32,
        decay: f32,
        speed_hz: f32,
        depth_ms: f32,
    },
    /// Tempo change without pitch change.
    Tempo { factor: f32 },
}

/// A built-in, parameter-fixed effect chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub steps: &'static [EffectStep],
}

const fn reverb(reverberance: f32, room_scale: f32, wet_gain_db: f32) -> EffectStep {
    EffectStep::Reverb {
        reverberance,
        room_scale,
        wet_gain_db,
    }
}

// Half an octave.
const PITCH_SHIFT_CENTS: f32 = 600.0;

pub const PRESETS: &[Preset] = &[
    Preset {
        id: "1",
        name: "room echo",
        steps: &[reverb(50.0, 50.0, 0.0)],
    },
    Preset {
        id: "2",
        name: "hall echo",
        steps: &[reverb(75.0, 75.0, 1.0)],
    },
    Preset {
        id: "3",
        name: "outside echo",
        steps: &[reverb(0.0, 5.0, 0.0)],
    },
    Preset {
        id: "4",
        name: "pitch down",
        steps: &[EffectStep::Pitch {
            cents: -PITCH_SHIFT_CENTS,
        }],
    },
    Preset {
        id: "5",
        name: "pitch up",
        steps: &[EffectStep::Pitch {
            cents: PITCH_SHIFT_CENTS,
        }],
    },
    Preset {
        id: "6",
        name: "telephone",
        steps: &[
            EffectStep::HighPass { hz: 800.0 },
            EffectStep::LowPass { hz: 3400.0 },
            EffectStep::Gain { db: 2.0 },
        ],
    },
    Preset {
        id: "7",
        name: "muffled",
        steps: &[EffectStep::LowPass { hz: 1200.0 }],
    },
    Preset {
        id: "8",
        name: "quieter",
        steps: &[EffectStep::Gain { db: -4.0 }],
    },
    Preset {
        id: "9",
        name: "ghost",
        steps: &[
            EffectStep::Reverse,
            reverb(100.0, 100.0, 1.0),
            EffectStep::Reverse,
            reverb(50.0, 100.0, 0.0),
        ],
    },
    Preset {
        id: "10",
        name: "chorus",
        steps: &[EffectStep::Chorus {
            in_gain: 0.5,
            out_gain: 0.5,
            delay_ms: 50.0,
            decay: 0.4,
            speed_hz: 0.25,
            depth_ms: 2.0,
        }],
    },
    Preset {
        id: "11",
        name: "slow down",
        steps: &[EffectStep::Tempo { factor: 0.5 }],
    },
    Preset {
        id: "12",
        name: "speed up",
        steps: &[EffectStep::Tempo { factor: 1.5 }],
    },
];

/// Look up a preset by its exact markup id.
pub fn preset(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

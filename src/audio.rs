//! Audio system using Web Audio API
//!
//! Procedurally generated cues and a low ambient drone - no external files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::AudioCue;

/// Running ambient drone (stopped on game over or when disabled)
struct Ambient {
    oscillators: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    ambient: Option<Ambient>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let defaults = Settings::default();
        Self {
            ctx,
            sfx_volume: defaults.effective_sfx_volume(),
            music_volume: defaults.effective_music_volume(),
            ambient: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volume and toggle changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if let Some(ambient) = &self.ambient {
            ambient.gain.gain().set_value(self.music_volume * 0.08);
        }
        if !settings.bgm_enabled {
            self.stop_ambient();
        }
    }

    /// Play a sound cue
    pub fn play(&self, cue: AudioCue) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            AudioCue::BallWallBounce => self.play_wall_bounce(ctx, vol),
            AudioCue::PaddleBounce => self.play_paddle_bounce(ctx, vol),
            AudioCue::BrickBreak => self.play_brick_break(ctx, vol),
            AudioCue::PowerupPickup => self.play_pickup(ctx, vol),
            AudioCue::LevelComplete => self.play_level_complete(ctx, vol),
            AudioCue::GameOver => self.play_game_over(ctx, vol),
        }
    }

    /// Start the ambient drone if it isn't already running
    pub fn start_ambient(&mut self) {
        if self.ambient.is_some() || self.music_volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Ok(gain) = ctx.create_gain() else { return };
        gain.gain().set_value(self.music_volume * 0.08);
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let mut oscillators = Vec::with_capacity(3);
        // Root, fifth and a slightly detuned octave
        for (freq, osc_type) in [
            (55.0, OscillatorType::Sine),
            (82.5, OscillatorType::Sine),
            (110.7, OscillatorType::Triangle),
        ] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                oscillators.push(osc);
            }
        }

        log::debug!("Ambient drone started ({} voices)", oscillators.len());
        self.ambient = Some(Ambient { oscillators, gain });
    }

    pub fn stop_ambient(&mut self) {
        if let Some(ambient) = self.ambient.take() {
            for osc in &ambient.oscillators {
                let _ = osc.stop();
            }
            let _ = ambient.gain.disconnect();
            log::debug!("Ambient drone stopped");
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Wall bounce - short high ping
    fn play_wall_bounce(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Paddle bounce - solid thump
    fn play_paddle_bounce(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Brick break (and descent) - crunchy square burst with falling pitch
    fn play_brick_break(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Power-up pickup - quick sawtooth sweep up with a sine sparkle on top
    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        if let Some((osc, gain)) = self.create_osc(ctx, 330.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1320.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }
        if let Some((osc, gain)) = self.create_osc(ctx, 1760.0, OscillatorType::Sine) {
            let t = t + 0.15;
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.35).ok();
        }
    }

    /// Level complete - major fanfare
    fn play_level_complete(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Game over - long square drone sliding down an octave, then a low thud
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.18, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(0.0, t + 1.2)
                .ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(110.0, t + 1.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.25).ok();
        }
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            let t = t + 1.2;
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.5)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.55).ok();
        }
    }
}

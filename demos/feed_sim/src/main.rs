// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scrolling feed that exercises discovery, enforcement, and the
//! diagnostics pipeline.
//!
//! A page keeps appending players, resets their rate on playback and seeks,
//! and recycles players that scroll out of view. Events go to both a
//! [`PrettyPrintSink`] on stdout and a [`RecorderSink`]; the recording is
//! exported as Chrome trace JSON (default `feed_trace.json`, or the first
//! argument).

use std::fs::File;
use std::io::BufWriter;

use ratekeep_core::config::RateConfig;
use ratekeep_core::discovery::{DiscoveryLoop, TickReport};
use ratekeep_core::global::GlobalRate;
use ratekeep_core::media::{MediaElement, MediaEvent};
use ratekeep_core::sim::{SimMedia, SimSurface};
use ratekeep_core::time::HostTime;
use ratekeep_core::trace::{
    BindEvent, BindSkippedEvent, CorrectionEvent, PruneEvent, RateSetEvent, TickEvent, TraceSink,
    Tracer,
};

use ratekeep_debug::pretty::PrettyPrintSink;
use ratekeep_debug::recorder::RecorderSink;

const SCAN_COUNT: u64 = 12;

/// Forwards every event to both sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_tick(&mut self, e: &TickEvent) {
        self.pretty.on_tick(e);
        self.recorder.on_tick(e);
    }

    fn on_bind(&mut self, e: &BindEvent) {
        self.pretty.on_bind(e);
        self.recorder.on_bind(e);
    }

    fn on_bind_skipped(&mut self, e: &BindSkippedEvent) {
        self.pretty.on_bind_skipped(e);
        self.recorder.on_bind_skipped(e);
    }

    fn on_rate_set(&mut self, e: &RateSetEvent) {
        self.pretty.on_rate_set(e);
        self.recorder.on_rate_set(e);
    }

    fn on_correction(&mut self, e: &CorrectionEvent) {
        self.pretty.on_correction(e);
        self.recorder.on_correction(e);
    }

    fn on_prune(&mut self, e: &PruneEvent) {
        self.pretty.on_prune(e);
        self.recorder.on_prune(e);
    }

    fn on_tick_summary(&mut self, r: &TickReport) {
        self.pretty.on_tick_summary(r);
        self.recorder.on_tick_summary(r);
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "feed_trace.json".to_owned());

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::with_writer(Box::new(std::io::stdout()) as Box<dyn std::io::Write>).quiet_ticks(true);
    let mut recorder = RecorderSink::new();
    let mut tee = Tee {
        pretty: &mut pretty,
        recorder: &mut recorder,
    };

    // -- page --------------------------------------------------------------
    let config = RateConfig::standard().with_pruning(true);
    let mut feed = DiscoveryLoop::new(SimSurface::new(), GlobalRate::new(&config), config);
    let mut players: Vec<SimMedia> = (0..3).map(|_| feed.host_mut().add_media(1.0)).collect();

    // The third player's wrapper has not been laid out yet.
    feed.host_mut().set_anchor(&players[2], false);

    // -- simulated scans ---------------------------------------------------
    let mut now = HostTime(1_000_000);
    for scan in 0..SCAN_COUNT {
        feed.tick(now, &mut Tracer::new(&mut tee));

        match scan {
            // The user speeds up the first player; the rate becomes the
            // page-wide default for players found later.
            0 => {
                feed.host()
                    .input(&players[0], 2.0, &mut Tracer::new(&mut tee));
            }
            // The wrapper lays out; the page appends another player.
            1 => {
                feed.host_mut().set_anchor(&players[2], true);
                players.push(feed.host_mut().add_media(1.0));
            }
            // The page's player script resets every rate on playback.
            3 => {
                for player in &players {
                    player.host_reset(1.0);
                    feed.host()
                        .fire(player, MediaEvent::Play, &mut Tracer::new(&mut tee));
                }
            }
            // A drag that overshoots the band is clamped.
            4 => {
                feed.host()
                    .input(&players[1], 9.0, &mut Tracer::new(&mut tee));
            }
            // The first player scrolls away and is recycled.
            6 => {
                let recycled = players.remove(0);
                feed.host_mut().remove_media(&recycled);
            }
            // A seek on a player the page reset silently.
            8 => {
                players[0].host_reset(1.0);
                feed.host()
                    .fire(&players[0], MediaEvent::Seeked, &mut Tracer::new(&mut tee));
            }
            _ => {}
        }

        now = now.saturating_add(config.poll_interval);
    }

    println!();
    for (idx, player) in players.iter().enumerate() {
        println!("player {idx}: {:.2}x", player.playback_rate());
    }
    println!(
        "{} bindings live, {} controls mounted, global rate {:.2}x",
        feed.len(),
        feed.host().live_controls(),
        feed.global().get(),
    );

    // -- export Chrome trace -----------------------------------------------
    let file = File::create(&path).expect("failed to create trace file");
    let mut writer = BufWriter::new(file);
    ratekeep_debug::chrome::export(recorder.events(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} events)", recorder.events().len());
}

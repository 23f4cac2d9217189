// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Drives a [`GiController`] the way an editor would: a scripted control
//! surface on one thread, a fixed-rate render loop on another.
//!
//! Usage: `sandbox [config.ron]`

mod headless;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossbeam_channel::{select, Receiver};
use vxgi_control::{GiConfig, GiController};
use vxgi_core::{DebugVisualizationMode, GiEvent};

use crate::headless::HeadlessBackend;

const FRAME_TIME: Duration = Duration::from_millis(16);
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);
const SCENE_LOAD_FRAMES: usize = 10;

fn render_loop(controller: Arc<GiController>, backend: Arc<HeadlessBackend>, shutdown: Receiver<()>) {
    let ticker = crossbeam_channel::tick(FRAME_TIME);
    let mut frame = 0u64;
    log::info!("Render thread started.");
    loop {
        select! {
            recv(ticker) -> _ => {
                frame += 1;
                backend.scene().advance();
                let report = controller.on_render_tick(backend.as_ref());
                if let Some(applied) = report.applied {
                    log::info!("Frame {frame}: applied {applied:?}");
                }
            }
            recv(shutdown) -> _ => break,
        }
    }
    log::info!("Render thread stopped after {frame} frames.");
}

/// Blocks until an event matching `wanted` arrives, logging the others.
fn wait_for(events: &flume::Receiver<GiEvent>, wanted: GiEvent) -> Result<()> {
    let deadline = Instant::now() + EVENT_TIMEOUT;
    loop {
        let event = events
            .recv_deadline(deadline)
            .with_context(|| format!("timed out waiting for {wanted:?}"))?;
        log::info!("UI: Event {event:?}");
        if event == wanted {
            return Ok(());
        }
    }
}

fn settle() {
    thread::sleep(FRAME_TIME * 3);
}

fn control_surface(
    controller: &GiController,
    backend: &HeadlessBackend,
    events: flume::Receiver<GiEvent>,
) -> Result<()> {
    log::info!("UI: Opened '{}'.", controller.title());

    wait_for(&events, GiEvent::CascadesEditableChanged(true))?;
    log::info!("UI: Cameras {:?}", controller.camera_list());

    while controller.cascades_editable() && controller.cascade_count() < 3 {
        let Some(cascade) = controller.add_cascade() else {
            bail!("cascade was rejected while editable");
        };
        log::info!("UI: Added cascade {:?}", cascade.half_extent);
    }

    if !controller.set_enabled(true) {
        bail!("GI could not be enabled");
    }
    wait_for(&events, GiEvent::CascadesEditableChanged(false))?;
    log::info!("UI: Voxelized {} time(s).", backend.scene().gi().build_count());

    controller.set_bounce_count(2);
    controller.set_debug_visualization(DebugVisualizationMode::Lighting);
    settle();

    controller.set_resolution([32, 32, 32]);
    settle();
    if controller.add_cascade().is_some() {
        bail!("cascades must be frozen once GI started");
    }

    backend.scene().activate_other_gi();
    wait_for(&events, GiEvent::EnabledChanged(false))?;
    log::info!(
        "UI: GI reported off (enabled={}), {} build(s) total.",
        controller.enabled(),
        backend.scene().gi().build_count()
    );
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => GiConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => GiConfig::default(),
    };

    let controller = Arc::new(GiController::new(config));
    let backend = Arc::new(HeadlessBackend::new(SCENE_LOAD_FRAMES));
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
    // Subscribe before the first tick so no start-up event is missed.
    let events = controller.events();

    let render = {
        let controller = controller.clone();
        let backend = backend.clone();
        thread::Builder::new()
            .name("render".into())
            .spawn(move || render_loop(controller, backend, shutdown_rx))?
    };

    let result = control_surface(&controller, &backend, events);
    // The render thread may already be gone if it panicked.
    let _ = shutdown_tx.send(());
    if render.join().is_err() {
        bail!("render thread panicked");
    }
    result
}

// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned DOM event listeners.
//!
//! [`Listeners`] keeps each registered closure alive for as long as it is
//! registered and removes every registration when dropped. It is the
//! subscription type of both web surfaces, so dropping a pruned binding's
//! subscription detaches its handlers from the element and the control.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, console};

use ratekeep_core::binder::Binding;
use ratekeep_core::host::SkipReason;
use ratekeep_core::media::MediaEvent;
use ratekeep_core::trace::Tracer;

use crate::console::ConsoleSink;
use crate::control::SliderControl;
use crate::media::DomMedia;

type EventClosure = Closure<dyn FnMut(Event)>;

struct Registration {
    target: EventTarget,
    kind: &'static str,
    closure: EventClosure,
}

/// A set of event listeners removed together on drop.
#[derive(Default)]
pub struct Listeners {
    registrations: Vec<Registration>,
}

impl Listeners {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind` events on `target`.
    pub fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.registrations.push(Registration {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for reg in self.registrations.drain(..) {
            let _ = reg
                .target
                .remove_event_listener_with_callback(reg.kind, reg.closure.as_ref().unchecked_ref());
        }
    }
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|reg| reg.kind))
            .finish()
    }
}

/// A binding as the web surfaces build it.
pub type DomBinding = Binding<DomMedia, SliderControl>;

/// Routes the element's rate-affecting notifications and the slider's input
/// to `binding`.
///
/// On a registration failure the handlers wired so far are removed again and
/// the element is left for the next scan.
pub(crate) fn subscribe(binding: &Rc<DomBinding>, sink: ConsoleSink) -> Result<Listeners, SkipReason> {
    let mut listeners = Listeners::new();
    match wire(&mut listeners, binding, sink) {
        Ok(()) => Ok(listeners),
        Err(err) => {
            console::warn_2(&JsValue::from_str("[ratekeep] listener registration failed"), &err);
            Err(SkipReason::SubscribeFailed)
        }
    }
}

fn wire(listeners: &mut Listeners, binding: &Rc<DomBinding>, sink: ConsoleSink) -> Result<(), JsValue> {
    let media: &EventTarget = binding.element().element();
    for event in MediaEvent::ALL {
        let binding = Rc::clone(binding);
        listeners.listen(media, event.dom_name(), move |_: Event| {
            let mut sink = sink;
            binding.on_event(event, &mut Tracer::new(&mut sink));
        })?;
    }

    let input = binding.control().input().clone();
    let binding = Rc::clone(binding);
    listeners.listen(&input, "input", move |_: Event| {
        let mut sink = sink;
        let requested = binding
            .control()
            .input()
            .value()
            .parse::<f64>()
            .unwrap_or(f64::NAN);
        binding.set_rate(requested, &mut Tracer::new(&mut sink));
    })?;
    Ok(())
}

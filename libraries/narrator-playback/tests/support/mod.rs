//! In-memory host page for playback tests
//!
//! A small fake DOM with real parent/child structure, fake audio handles,
//! and a fake mutation observer. Listener registrations behave like the
//! browser's: dropping the registration detaches the handler, and
//! replacing a node with its clone leaves every old handler behind.

#![allow(dead_code)]

use async_trait::async_trait;
use narrator_core::{ElementPath, NarratorConfig, ResolvedAudioUrl};
use narrator_playback::{
    Control, ControlEvent, Handler, LocalTask, Media, MediaEvent, Platform, PlaybackController,
    PlaybackError, PlaybackState, Result,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use std::sync::Once;
use std::time::Duration;

pub const BASE: &str = "https://audio.example.com/BOM";
pub const HOST: &str = "https://host.example";

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn chapter_href(book: &str, chapter: u32) -> String {
    format!("{HOST}/study/scriptures/bofm/{book}/{chapter}?lang=eng")
}

pub fn chapter_audio(folder: &str, chapter: u32) -> String {
    format!("{BASE}/{folder}/{chapter}.mp3")
}

pub fn test_config() -> NarratorConfig {
    NarratorConfig {
        audio_base_url: BASE.to_string(),
        ..NarratorConfig::default()
    }
}

pub fn controller_for(platform: &Rc<FakePlatform>) -> PlaybackController<FakePlatform> {
    PlaybackController::new(Rc::clone(platform), test_config(), PlaybackState::new())
        .expect("valid test config")
}

pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(1)).await;
}

// ===== Listeners =====

type SharedHandler = Rc<RefCell<Handler>>;

#[derive(Default)]
pub struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, &'static str, SharedHandler)>>,
}

impl Listeners {
    fn add(&self, event: &'static str, handler: Handler) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries
            .borrow_mut()
            .push((id, event, Rc::new(RefCell::new(handler))));
        id
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry, _, _)| *entry != id);
    }

    pub fn count(&self, event: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, name, _)| *name == event)
            .count()
    }

    pub fn fire(&self, event: &str) {
        let handlers: Vec<SharedHandler> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, name, _)| *name == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            let mut handler = handler.borrow_mut();
            (&mut **handler)();
        }
    }
}

/// Registration guard; dropping it removes the handler
pub struct FakeListener {
    listeners: Weak<Listeners>,
    id: u64,
}

impl FakeListener {
    fn register(listeners: &Rc<Listeners>, event: &'static str, handler: Handler) -> Self {
        let id = listeners.add(event, handler);
        Self {
            listeners: Rc::downgrade(listeners),
            id,
        }
    }
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

// ===== Elements =====

pub struct FakeNode {
    name: String,
    disabled: Cell<bool>,
    disabled_log: RefCell<Vec<bool>>,
    connected: Cell<bool>,
    text: RefCell<String>,
    value: RefCell<String>,
    styles: RefCell<HashMap<String, String>>,
    attributes: RefCell<HashMap<String, String>>,
    parent: RefCell<Weak<FakeNode>>,
    children: RefCell<Vec<FakeControl>>,
    listeners: Rc<Listeners>,
}

#[derive(Clone)]
pub struct FakeControl(Rc<FakeNode>);

impl FakeControl {
    pub fn new(name: &str) -> Self {
        Self(Rc::new(FakeNode {
            name: name.to_string(),
            disabled: Cell::new(false),
            disabled_log: RefCell::new(Vec::new()),
            connected: Cell::new(false),
            text: RefCell::new(String::new()),
            value: RefCell::new(String::new()),
            styles: RefCell::new(HashMap::new()),
            attributes: RefCell::new(HashMap::new()),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            listeners: Rc::new(Listeners::default()),
        }))
    }

    pub fn name(&self) -> String {
        self.0.name.clone()
    }

    pub fn append(&self, child: &FakeControl) {
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        child.set_connected_deep(self.is_connected());
        self.0.children.borrow_mut().push(child.clone());
    }

    pub fn children(&self) -> Vec<FakeControl> {
        self.0.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<FakeControl> {
        self.0.parent.borrow().upgrade().map(FakeControl)
    }

    pub fn is_same(&self, other: &FakeControl) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn set_connected_deep(&self, connected: bool) {
        self.0.connected.set(connected);
        for child in self.0.children.borrow().iter() {
            child.set_connected_deep(connected);
        }
    }

    /// Handler the host page itself installed; never removed
    pub fn add_host_listener(&self, event: &'static str, handler: Handler) {
        self.0.listeners.add(event, handler);
    }

    pub fn click(&self) {
        self.0.listeners.fire("click");
    }

    /// User drags the scrub input to `value`
    pub fn input(&self, value: &str) {
        *self.0.value.borrow_mut() = value.to_string();
        self.0.listeners.fire("input");
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0.listeners.count(event)
    }

    pub fn text(&self) -> String {
        self.0.text.borrow().clone()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.styles.borrow().get(property).cloned()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.borrow().get(name).cloned()
    }

    pub fn disabled_log(&self) -> Vec<bool> {
        self.0.disabled_log.borrow().clone()
    }

    fn deep_clone(&self) -> FakeControl {
        let copy = FakeControl::new(&self.0.name);
        copy.0.disabled.set(self.0.disabled.get());
        *copy.0.text.borrow_mut() = self.text();
        *copy.0.value.borrow_mut() = self.value();
        *copy.0.styles.borrow_mut() = self.0.styles.borrow().clone();
        *copy.0.attributes.borrow_mut() = self.0.attributes.borrow().clone();
        for child in self.0.children.borrow().iter() {
            copy.append(&child.deep_clone());
        }
        copy
    }
}

impl Control for FakeControl {
    fn set_disabled(&self, disabled: bool) {
        self.0.disabled.set(disabled);
        self.0.disabled_log.borrow_mut().push(disabled);
    }

    fn is_disabled(&self) -> bool {
        self.0.disabled.get()
    }

    fn is_connected(&self) -> bool {
        self.0.connected.get()
    }

    fn set_text(&self, text: &str) {
        *self.0.text.borrow_mut() = text.to_string();
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        self.0
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn set_value(&self, value: &str) {
        *self.0.value.borrow_mut() = value.to_string();
    }

    fn value(&self) -> String {
        self.0.value.borrow().clone()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.0
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

// ===== Media =====

pub struct FakeMediaState {
    source: String,
    paused: Cell<bool>,
    current_time: Cell<f64>,
    duration: Cell<f64>,
    listeners: Rc<Listeners>,
}

#[derive(Clone)]
pub struct FakeMedia(Rc<FakeMediaState>);

impl FakeMedia {
    pub fn new(source: &str, duration: f64) -> Self {
        Self(Rc::new(FakeMediaState {
            source: source.to_string(),
            paused: Cell::new(true),
            current_time: Cell::new(0.0),
            duration: Cell::new(duration),
            listeners: Rc::new(Listeners::default()),
        }))
    }

    /// Playback reached `seconds`
    pub fn advance_to(&self, seconds: f64) {
        self.0.current_time.set(seconds);
        self.0.listeners.fire("timeupdate");
    }

    pub fn finish(&self) {
        self.0.current_time.set(self.0.duration.get());
        self.0.paused.set(true);
        self.0.listeners.fire("ended");
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0.listeners.count(event)
    }

    pub fn is_same(&self, other: &FakeMedia) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Media for FakeMedia {
    fn play(&self) {
        if self.0.paused.replace(false) {
            self.0.listeners.fire("play");
        }
    }

    fn pause(&self) {
        if !self.0.paused.replace(true) {
            self.0.listeners.fire("pause");
        }
    }

    fn is_paused(&self) -> bool {
        self.0.paused.get()
    }

    fn current_time(&self) -> f64 {
        self.0.current_time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        self.0.current_time.set(seconds);
    }

    fn duration(&self) -> f64 {
        self.0.duration.get()
    }

    fn source(&self) -> String {
        self.0.source.clone()
    }
}

// ===== Host page =====

/// The host's open player chrome
pub struct PlayerChrome {
    pub close: FakeControl,
    pub play: FakeControl,
    pub scrub: FakeControl,
    pub fill: FakeControl,
    pub elapsed: FakeControl,
    pub total: FakeControl,
    /// Times the host's own play handler ran
    pub host_play_clicks: Rc<Cell<usize>>,
}

type LoadHook = Box<dyn FnOnce(&FakePlatform)>;

pub struct FakePlatform {
    config: NarratorConfig,
    href: RefCell<String>,
    mounted: RefCell<Vec<(String, FakeControl)>>,
    loads: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
    load_delay: Cell<Duration>,
    media_duration: Cell<f64>,
    toggle_disabled_at_load: RefCell<Vec<bool>>,
    created_media: RefCell<Vec<FakeMedia>>,
    load_hook: RefCell<Option<LoadHook>>,
    mutation_observers: Rc<Listeners>,
}

impl FakePlatform {
    pub fn new(href: &str) -> Rc<Self> {
        init_tracing();
        Rc::new(Self {
            config: test_config(),
            href: RefCell::new(href.to_string()),
            mounted: RefCell::new(Vec::new()),
            loads: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
            load_delay: Cell::new(Duration::from_millis(50)),
            media_duration: Cell::new(181.0),
            toggle_disabled_at_load: RefCell::new(Vec::new()),
            created_media: RefCell::new(Vec::new()),
            load_hook: RefCell::new(None),
            mutation_observers: Rc::new(Listeners::default()),
        })
    }

    // --- document ---

    pub fn mount(&self, selector: &str, control: &FakeControl) {
        control.set_connected_deep(true);
        self.mounted
            .borrow_mut()
            .push((selector.to_string(), control.clone()));
    }

    pub fn unmount(&self, selector: &str) {
        self.mounted.borrow_mut().retain(|(mounted, control)| {
            if mounted == selector {
                control.set_connected_deep(false);
                false
            } else {
                true
            }
        });
    }

    pub fn mount_toggle(&self) -> FakeControl {
        let toggle = FakeControl::new("toggle");
        self.mount(&self.config.selectors.toggle, &toggle);
        toggle
    }

    /// Host reacts to the toggle: toggle goes away, player chrome appears
    pub fn open_chrome(&self) -> PlayerChrome {
        self.unmount(&self.config.selectors.toggle);

        let close = FakeControl::new("close");
        let play = FakeControl::new("play");
        let host_play_clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&host_play_clicks);
        play.add_host_listener("click", Box::new(move || counter.set(counter.get() + 1)));

        // container[elapsed, track[fill, scrub], total]
        let container = FakeControl::new("progress");
        let elapsed = FakeControl::new("elapsed");
        let track = FakeControl::new("track");
        let fill = FakeControl::new("fill");
        let scrub = FakeControl::new("scrub");
        let total = FakeControl::new("total");
        track.append(&fill);
        track.append(&scrub);
        container.append(&elapsed);
        container.append(&track);
        container.append(&total);

        self.mount(&self.config.selectors.close, &close);
        self.mount(&self.config.selectors.play, &play);
        self.mount("#progress", &container);
        self.mount(&self.config.selectors.scrub, &scrub);

        PlayerChrome {
            close,
            play,
            scrub,
            fill,
            elapsed,
            total,
            host_play_clicks,
        }
    }

    /// Host reacts to close: chrome is torn down, a fresh toggle appears
    pub fn close_chrome(&self) -> FakeControl {
        let selectors = self.config.selectors.clone();
        self.unmount(&selectors.close);
        self.unmount(&selectors.play);
        self.unmount("#progress");
        self.unmount(&selectors.scrub);
        self.mount_toggle()
    }

    // --- location ---

    pub fn navigate(&self, href: &str) {
        *self.href.borrow_mut() = href.to_string();
    }

    /// Deliver one mutation batch to every observer
    pub fn mutate(&self) {
        self.mutation_observers.fire("mutation");
    }

    pub fn observer_count(&self) -> usize {
        self.mutation_observers.count("mutation")
    }

    // --- media ---

    pub fn fail_loads_of(&self, url: &str) {
        self.failing.borrow_mut().insert(url.to_string());
    }

    pub fn set_load_delay(&self, delay: Duration) {
        self.load_delay.set(delay);
    }

    pub fn set_media_duration(&self, seconds: f64) {
        self.media_duration.set(seconds);
    }

    /// Run `hook` while the next load is in flight
    pub fn during_next_load(&self, hook: impl FnOnce(&FakePlatform) + 'static) {
        *self.load_hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }

    pub fn toggle_disabled_at_load(&self) -> Vec<bool> {
        self.toggle_disabled_at_load.borrow().clone()
    }

    pub fn last_media(&self) -> Option<FakeMedia> {
        self.created_media.borrow().last().cloned()
    }
}

fn path_of(href: &str) -> String {
    let rest = href.split_once("://").map_or(href, |(_, rest)| rest);
    let path = rest.find('/').map_or("", |start| &rest[start..]);
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].to_string()
}

#[async_trait(?Send)]
impl Platform for FakePlatform {
    type Control = FakeControl;
    type Media = FakeMedia;
    type Listener = FakeListener;
    type Observer = FakeListener;

    fn query(&self, selector: &str) -> Option<FakeControl> {
        self.mounted
            .borrow()
            .iter()
            .find(|(mounted, control)| mounted == selector && control.is_connected())
            .map(|(_, control)| control.clone())
    }

    fn traverse(&self, from: &FakeControl, path: &ElementPath) -> Option<FakeControl> {
        let mut node = from.clone();
        for _ in 0..path.up {
            node = node.parent()?;
        }
        for &index in &path.children {
            node = node.children().get(index)?.clone();
        }
        Some(node)
    }

    fn replace_with_clone(&self, control: &FakeControl) -> Result<FakeControl> {
        if !control.is_connected() {
            return Err(PlaybackError::dom(format!(
                "{} is not in the document",
                control.name()
            )));
        }

        let copy = control.deep_clone();
        if let Some(parent) = control.parent() {
            let mut children = parent.0.children.borrow_mut();
            if let Some(slot) = children.iter_mut().find(|child| child.is_same(control)) {
                *copy.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
                *slot = copy.clone();
            }
        }

        for (_, mounted) in self.mounted.borrow_mut().iter_mut() {
            if mounted.is_same(control) {
                *mounted = copy.clone();
            }
        }

        control.set_connected_deep(false);
        copy.set_connected_deep(true);
        Ok(copy)
    }

    fn listen(
        &self,
        control: &FakeControl,
        event: ControlEvent,
        handler: Handler,
    ) -> Result<FakeListener> {
        Ok(FakeListener::register(
            &control.0.listeners,
            event.as_str(),
            handler,
        ))
    }

    fn listen_media(
        &self,
        media: &FakeMedia,
        event: MediaEvent,
        handler: Handler,
    ) -> Result<FakeListener> {
        Ok(FakeListener::register(
            &media.0.listeners,
            event.as_str(),
            handler,
        ))
    }

    fn location_href(&self) -> String {
        self.href.borrow().clone()
    }

    fn location_path(&self) -> String {
        path_of(&self.href.borrow())
    }

    async fn load_media(&self, url: &ResolvedAudioUrl) -> Result<FakeMedia> {
        self.loads.borrow_mut().push(url.to_string());

        let toggle_disabled = self
            .query(&self.config.selectors.toggle)
            .is_some_and(|toggle| toggle.is_disabled());
        self.toggle_disabled_at_load
            .borrow_mut()
            .push(toggle_disabled);

        let hook = self.load_hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook(self);
        }

        tokio::time::sleep(self.load_delay.get()).await;

        if self.failing.borrow().contains(url.as_str()) {
            return Err(PlaybackError::load_failed(url.as_str(), "404 Not Found"));
        }

        let media = FakeMedia::new(url.as_str(), self.media_duration.get());
        self.created_media.borrow_mut().push(media.clone());
        Ok(media)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn spawn(&self, task: LocalTask) {
        tokio::task::spawn_local(task);
    }

    fn observe_mutations(&self, callback: Handler) -> Result<FakeListener> {
        Ok(FakeListener::register(
            &self.mutation_observers,
            "mutation",
            callback,
        ))
    }
}

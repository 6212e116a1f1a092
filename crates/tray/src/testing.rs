//! In-memory host used by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use std::sync::{Arc, Condvar, Mutex};

use image::{Rgba, RgbaImage};
use traydemo_icons::{IconEntry, IconSet};

use crate::controller::ReportFn;
use crate::host::{ClipboardContent, Notification, TrayHost, TrayRuntime};
use crate::menu::MenuItem;
use crate::{HostError, encode_png};

/// Two-entry icon set whose last entry is a 2x2 PNG.
pub fn icon_set() -> IconSet {
    let small = encode_png(&RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]))).unwrap();
    let large = encode_png(&RgbaImage::from_pixel(2, 2, Rgba([4, 5, 6, 255]))).unwrap();
    IconSet::new(vec![
        IconEntry::new(*b"ic07", small),
        IconEntry::new(*b"ic10", large),
    ])
    .unwrap()
}

/// Collects reported lines.
#[derive(Clone, Default)]
pub struct Reports {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Reports {
    pub fn reporter(&self) -> ReportFn {
        let lines = Arc::clone(&self.lines);
        Arc::new(move |line: &str| lines.lock().unwrap().push(line.to_string()))
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct HostState {
    clipboard: ClipboardContent,
    status_icons: Vec<Vec<u8>>,
    notifications: Vec<Notification>,
    initialized: Option<(String, Vec<u8>)>,
    pushes_before_init: usize,
}

#[derive(Default)]
pub struct FakeHost {
    state: Mutex<HostState>,
    clipboard_fails: AtomicBool,
    reject_icons: AtomicBool,
    notifications_fail: AtomicBool,
    panic_on_icon: AtomicBool,
    icon_attempts: AtomicUsize,
    exited: Mutex<bool>,
    exit_signal: Condvar,
}

impl FakeHost {
    pub fn fail_clipboard(&self, fail: bool) {
        self.clipboard_fails.store(fail, Ordering::SeqCst);
    }

    pub fn reject_status_icons(&self, reject: bool) {
        self.reject_icons.store(reject, Ordering::SeqCst);
    }

    /// Makes the next status icon push panic, taking the animator task down.
    pub fn panic_on_status_icon(&self, panic: bool) {
        self.panic_on_icon.store(panic, Ordering::SeqCst);
    }

    /// Status icon pushes attempted, including rejected and panicking ones.
    pub fn status_icon_attempts(&self) -> usize {
        self.icon_attempts.load(Ordering::SeqCst)
    }

    pub fn fail_notifications(&self, fail: bool) {
        self.notifications_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_clipboard(&self, content: ClipboardContent) {
        self.state.lock().unwrap().clipboard = content;
    }

    pub fn clipboard(&self) -> ClipboardContent {
        self.state.lock().unwrap().clipboard.clone()
    }

    pub fn status_icons(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().status_icons.clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn initialized(&self) -> Option<(String, Vec<u8>)> {
        self.state.lock().unwrap().initialized.clone()
    }

    pub fn pushes_before_init(&self) -> usize {
        self.state.lock().unwrap().pushes_before_init
    }

    pub fn exited(&self) -> bool {
        *self.exited.lock().unwrap()
    }

    fn wait_for_exit(&self) {
        let mut exited = self.exited.lock().unwrap();
        while !*exited {
            exited = self.exit_signal.wait(exited).unwrap();
        }
    }

    fn clipboard_check(&self) -> Result<(), HostError> {
        if self.clipboard_fails.load(Ordering::SeqCst) {
            return Err(HostError::Clipboard("clipboard unavailable".into()));
        }
        Ok(())
    }
}

impl TrayHost for FakeHost {
    fn set_status_icon(&self, png: &[u8]) -> Result<(), HostError> {
        self.icon_attempts.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_icon.load(Ordering::SeqCst) {
            panic!("status icon backend crashed");
        }
        if self.reject_icons.load(Ordering::SeqCst) {
            return Err(HostError::Closed);
        }
        let mut state = self.state.lock().unwrap();
        if state.initialized.is_none() {
            state.pushes_before_init += 1;
        }
        state.status_icons.push(png.to_vec());
        Ok(())
    }

    fn clipboard_content(&self) -> Result<ClipboardContent, HostError> {
        self.clipboard_check()?;
        Ok(self.clipboard())
    }

    fn set_clipboard_text(&self, text: &str) -> Result<(), HostError> {
        self.clipboard_check()?;
        self.state.lock().unwrap().clipboard = ClipboardContent {
            text: text.to_string(),
            ..ClipboardContent::default()
        };
        Ok(())
    }

    fn display_notification(&self, notification: Notification) -> Result<(), HostError> {
        if self.notifications_fail.load(Ordering::SeqCst) {
            return Err(HostError::Notification("no notification server".into()));
        }
        self.state.lock().unwrap().notifications.push(notification);
        Ok(())
    }

    fn exit(&self) {
        *self.exited.lock().unwrap() = true;
        self.exit_signal.notify_all();
    }
}

/// Runtime whose loop blocks until the fake host is asked to exit.
pub struct FakeRuntime {
    host: Arc<FakeHost>,
    menu: Arc<Mutex<Vec<MenuItem>>>,
    fail_init: bool,
    fail_loop: bool,
}

impl FakeRuntime {
    pub fn new(host: Arc<FakeHost>) -> Self {
        Self {
            host,
            menu: Arc::default(),
            fail_init: false,
            fail_loop: false,
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Loop that fails once the animator has attempted its first push.
    pub fn failing_loop(mut self) -> Self {
        self.fail_loop = true;
        self
    }

    /// Menu registered at initialization, shared with the test.
    pub fn menu(&self) -> Arc<Mutex<Vec<MenuItem>>> {
        Arc::clone(&self.menu)
    }
}

impl TrayRuntime for FakeRuntime {
    fn host(&self) -> Arc<dyn TrayHost> {
        self.host.clone()
    }

    fn initialize(
        &mut self,
        app_name: &str,
        icon: &[u8],
        menu: Vec<MenuItem>,
    ) -> Result<(), HostError> {
        if self.fail_init {
            return Err(HostError::Init("no status bar available".into()));
        }
        self.host.state.lock().unwrap().initialized = Some((app_name.to_string(), icon.to_vec()));
        *self.menu.lock().unwrap() = menu;
        Ok(())
    }

    fn enter_loop(self) -> Result<(), HostError> {
        if self.fail_loop {
            let deadline = Instant::now() + Duration::from_secs(5);
            while self.host.status_icon_attempts() == 0 && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(1));
            }
            return Err(HostError::Init("tray icon creation failed".into()));
        }
        self.host.wait_for_exit();
        Ok(())
    }
}

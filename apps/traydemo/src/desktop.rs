//! Native tray host built on `tao` and `tray-icon`.
//!
//! The event loop owns the tray icon and must run on the main thread. Every
//! other thread talks to it through [`TrayUpdate`] events sent via an
//! [`EventLoopProxy`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::platform::run_return::EventLoopExtRunReturn;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem as NativeMenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use traydemo_tray::{
    Callback, ClipboardContent, HostError, MenuItem, Notification, TrayHost, TrayRuntime,
};

use crate::{clipboard, notification};

/// Events delivered to the tray loop.
pub(crate) enum TrayUpdate {
    MenuClicked(MenuId),
    SetIcon(Raster),
    NotificationFinished { id: u64, clicked: bool },
    Exit,
}

/// Decoded RGBA pixels ready to become a tray icon.
pub(crate) struct Raster {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl Raster {
    pub fn decode(png: &[u8]) -> Result<Self, HostError> {
        let image = image::load_from_memory(png)
            .map_err(|e| HostError::Icon(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            rgba: image.into_raw(),
            width,
            height,
        })
    }

    pub fn into_icon(self) -> Result<Icon, HostError> {
        Icon::from_rgba(self.rgba, self.width, self.height)
            .map_err(|e| HostError::Icon(e.to_string()))
    }
}

/// Thread-safe handle to the running tray loop.
pub struct DesktopHost {
    proxy: Mutex<EventLoopProxy<TrayUpdate>>,
    clicks: Mutex<HashMap<u64, Callback>>,
    next_notification: AtomicU64,
}

impl DesktopHost {
    fn new(proxy: EventLoopProxy<TrayUpdate>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
            clicks: Mutex::new(HashMap::new()),
            next_notification: AtomicU64::new(1),
        }
    }

    fn proxy(&self) -> EventLoopProxy<TrayUpdate> {
        self.proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn send(&self, update: TrayUpdate) -> Result<(), HostError> {
        self.proxy()
            .send_event(update)
            .map_err(|_| HostError::Closed)
    }

    fn take_click(&self, id: u64) -> Option<Callback> {
        self.clicks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

impl TrayHost for DesktopHost {
    fn set_status_icon(&self, png: &[u8]) -> Result<(), HostError> {
        // Decode on the caller's thread to keep the loop responsive.
        let raster = Raster::decode(png)?;
        self.send(TrayUpdate::SetIcon(raster))
    }

    fn clipboard_content(&self) -> Result<ClipboardContent, HostError> {
        clipboard::read()
    }

    fn set_clipboard_text(&self, text: &str) -> Result<(), HostError> {
        clipboard::write_text(text)
    }

    fn display_notification(&self, notification: Notification) -> Result<(), HostError> {
        let id = self.next_notification.fetch_add(1, Ordering::Relaxed);
        if notification::REPORTS_ACTIVATION
            && let Some(on_click) = notification.on_click.clone()
        {
            self.clicks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id, on_click);
        }

        let proxy = self.proxy();
        let shown = notification::show(&notification, id, move |clicked| {
            // The loop may already be gone; nothing to deliver then.
            let _ = proxy.send_event(TrayUpdate::NotificationFinished { id, clicked });
        });

        if let Err(e) = shown {
            self.take_click(id);
            return Err(e);
        }
        tracing::debug!(id, title = %notification.title, "notification displayed");
        Ok(())
    }

    fn exit(&self) {
        if self.send(TrayUpdate::Exit).is_err() {
            tracing::debug!("tray loop already stopped");
        }
    }
}

/// Tray contents registered by `initialize`, materialized when the loop starts.
struct PendingTray {
    tooltip: String,
    icon: Icon,
    menu: Menu,
    handlers: HashMap<MenuId, MenuItem>,
}

/// Owns the native event loop. Must be created on the main thread.
pub struct DesktopRuntime {
    event_loop: EventLoop<TrayUpdate>,
    host: Arc<DesktopHost>,
    pending: Option<PendingTray>,
}

impl DesktopRuntime {
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut event_loop = EventLoopBuilder::<TrayUpdate>::with_user_event().build();

        #[cfg(target_os = "macos")]
        {
            use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
            // Status bar only, no Dock icon.
            event_loop.set_activation_policy(ActivationPolicy::Accessory);
        }

        let proxy = event_loop.create_proxy();
        let menu_proxy = Mutex::new(proxy.clone());
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            let proxy = menu_proxy.lock().unwrap_or_else(PoisonError::into_inner);
            if proxy.send_event(TrayUpdate::MenuClicked(event.id)).is_err() {
                tracing::debug!("menu event after tray loop stopped");
            }
        }));

        Self {
            event_loop,
            host: Arc::new(DesktopHost::new(proxy)),
            pending: None,
        }
    }
}

impl Default for DesktopRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn menu_error(e: tray_icon::menu::Error) -> HostError {
    HostError::Init(format!("failed to build menu: {e}"))
}

impl TrayRuntime for DesktopRuntime {
    fn host(&self) -> Arc<dyn TrayHost> {
        self.host.clone()
    }

    fn initialize(
        &mut self,
        app_name: &str,
        icon: &[u8],
        menu: Vec<MenuItem>,
    ) -> Result<(), HostError> {
        let icon = Raster::decode(icon)
            .and_then(Raster::into_icon)
            .map_err(|e| HostError::Init(format!("unusable default icon: {e}")))?;

        let native = Menu::new();
        let mut handlers = HashMap::new();
        for item in menu {
            if item.is_separator() {
                native
                    .append(&PredefinedMenuItem::separator())
                    .map_err(menu_error)?;
                continue;
            }
            let entry = NativeMenuItem::new(item.title(), true, None);
            native.append(&entry).map_err(menu_error)?;
            handlers.insert(entry.id().clone(), item);
        }

        tracing::debug!(app = app_name, items = handlers.len(), "tray menu built");
        self.pending = Some(PendingTray {
            tooltip: app_name.to_string(),
            icon,
            menu: native,
            handlers,
        });
        Ok(())
    }

    fn enter_loop(self) -> Result<(), HostError> {
        let Self {
            mut event_loop,
            host,
            pending,
        } = self;
        let Some(PendingTray {
            tooltip,
            icon,
            menu,
            handlers,
        }) = pending
        else {
            return Err(HostError::Init("tray runtime was not initialized".into()));
        };

        let mut parts = Some((icon, menu));
        let mut tray: Option<TrayIcon> = None;
        let mut failure: Option<HostError> = None;
        let mut exiting = false;

        event_loop.run_return(|event, _, control_flow| {
            if exiting {
                *control_flow = ControlFlow::Exit;
                return;
            }
            *control_flow = ControlFlow::Wait;

            match event {
                // The tray icon can only be created once the loop is running.
                Event::NewEvents(StartCause::Init) => {
                    let Some((icon, menu)) = parts.take() else {
                        return;
                    };
                    let built = TrayIconBuilder::new()
                        .with_tooltip(&tooltip)
                        .with_icon(icon)
                        .with_menu(Box::new(menu))
                        .build();
                    match built {
                        Ok(icon) => {
                            tracing::info!("tray icon ready");
                            tray = Some(icon);
                        }
                        Err(e) => {
                            failure = Some(HostError::Init(e.to_string()));
                            exiting = true;
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                }
                Event::UserEvent(TrayUpdate::MenuClicked(id)) => match handlers.get(&id) {
                    Some(item) => {
                        tracing::debug!(item = item.title(), "menu item clicked");
                        item.activate();
                    }
                    None => tracing::debug!(id = ?id, "click on unknown menu item"),
                },
                Event::UserEvent(TrayUpdate::SetIcon(raster)) => {
                    let Some(tray) = &tray else {
                        return;
                    };
                    let updated = raster.into_icon().and_then(|icon| {
                        tray.set_icon(Some(icon))
                            .map_err(|e| HostError::Icon(e.to_string()))
                    });
                    if let Err(e) = updated {
                        tracing::warn!("failed to update status icon: {e}");
                    }
                }
                Event::UserEvent(TrayUpdate::NotificationFinished { id, clicked }) => {
                    if let Some(on_click) = host.take_click(id)
                        && clicked
                    {
                        on_click();
                    }
                }
                Event::UserEvent(TrayUpdate::Exit) => {
                    tracing::info!("tray loop exiting");
                    exiting = true;
                    *control_flow = ControlFlow::Exit;
                }
                _ => {}
            }
        });

        drop(tray);
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use traydemo_tray::encode_png;

    #[test]
    fn raster_decodes_png() {
        let png = encode_png(&RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]))).unwrap();
        let raster = Raster::decode(&png).unwrap();

        assert_eq!((raster.width, raster.height), (3, 2));
        assert_eq!(raster.rgba.len(), 3 * 2 * 4);
        assert_eq!(&raster.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn raster_rejects_garbage() {
        let err = Raster::decode(b"not an image").err().unwrap();
        assert!(matches!(err, HostError::Icon(_)));
    }

    #[test]
    fn raster_becomes_icon() {
        let png = encode_png(&RgbaImage::from_pixel(16, 16, Rgba([0, 128, 0, 255]))).unwrap();
        assert!(Raster::decode(&png).unwrap().into_icon().is_ok());
    }
}

//! End-to-end navigation flows through the shell, with a fake media
//! directory standing in for the filesystem.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use telecine::config::Config;
use telecine::locale::Localization;
use telecine::modules::{ModuleContext, ModuleManager, MoviesModule};
use telecine::nav::{
    EventBus, Key, MENU_VIEW_NAME, MenuEntry, MenuModel, NoResources, Shell, ViewRegistry,
    ViewStack,
};
use telecine::platform::desktop::{DesktopKeyMap, StubVideoControl};
use telecine::platform::{MediaDirectory, MediaEntry, MediaKind, Platform};
use telecine::views::{
    MenuViewController, VIDEO_BROWSER_VIEW_NAME, VIDEO_VIEW_NAME, VideoViewController,
};

struct FixedMedia {
    entries: Vec<MediaEntry>,
}

impl MediaDirectory for FixedMedia {
    fn list_entries(&self, _path: &str) -> Result<Vec<MediaEntry>> {
        // deliberately unsorted
        Ok(self.entries.clone())
    }
}

fn entry(kind: MediaKind, title: &str) -> MediaEntry {
    MediaEntry {
        kind,
        locator: format!("/m/{title}"),
        title: title.to_string(),
        thumbnail_ref: None,
        sheet_ref: match kind {
            MediaKind::File => Some(format!("/m/_MovieSheets/{title}/sheet.jpg")),
            MediaKind::Folder => None,
        },
    }
}

/// Full application wiring, minus the terminal: modules set up, menu shown,
/// commands drained.
async fn shell_with_media(entries: Vec<MediaEntry>) -> Shell {
    let config = Config::default();
    let platform = Platform {
        media: Rc::new(FixedMedia { entries }),
        video: Rc::new(StubVideoControl::new()),
        keymap: Rc::new(DesktopKeyMap),
    };
    let i18n = Rc::new(RefCell::new(Localization::new("en")));

    let mut menus = MenuModel::new("Main Menu");
    let mut registry = ViewRegistry::new();
    let mut bus = EventBus::new();

    let mut manager = ModuleManager::new();
    manager.register(Box::new(MoviesModule));
    {
        let mut ctx = ModuleContext {
            config: &config,
            platform: &platform,
            i18n: i18n.clone(),
            menus: &mut menus,
            registry: &mut registry,
            bus: &mut bus,
        };
        manager.set_up_all(&mut ctx).unwrap();
    }
    menus.append_entry(menus.main_menu(), MenuEntry::new("Settings"));

    let menus = Rc::new(menus);
    let main_menu = menus.main_menu();
    {
        let menus = menus.clone();
        let i18n = i18n.clone();
        registry
            .register(MENU_VIEW_NAME, move || {
                Rc::new(RefCell::new(MenuViewController::new(
                    menus.clone(),
                    i18n.clone(),
                )))
            })
            .unwrap();
    }
    {
        let video = platform.video.clone();
        registry
            .register(VIDEO_VIEW_NAME, move || {
                Rc::new(RefCell::new(VideoViewController::new(video.clone())))
            })
            .unwrap();
    }

    let views = ViewStack::new(registry, Box::new(NoResources));
    let mut shell = Shell::new(views, bus, platform, i18n);
    shell.show_menu(main_menu);
    shell.drain_commands().await;
    shell
}

fn current_view(shell: &Shell) -> String {
    shell
        .views()
        .current_view()
        .map(|name| name.canonical())
        .unwrap_or_default()
}

async fn press(shell: &mut Shell, key: Key) {
    shell.dispatch_key(key);
    shell.drain_commands().await;
}

#[tokio::test]
async fn menu_entry_opens_the_video_browser_and_back_returns() {
    let mut shell = shell_with_media(vec![entry(MediaKind::File, "Alien")]).await;
    assert_eq!(current_view(&shell), MENU_VIEW_NAME);

    // first entry is the movies module's
    press(&mut shell, Key::Enter).await;
    assert_eq!(current_view(&shell), VIDEO_BROWSER_VIEW_NAME);
    assert_eq!(shell.views().len(), 2);

    press(&mut shell, Key::Back).await;
    assert_eq!(current_view(&shell), MENU_VIEW_NAME);
    assert_eq!(shell.views().len(), 1);
}

#[tokio::test]
async fn back_on_the_root_menu_is_a_no_op() {
    let mut shell = shell_with_media(vec![]).await;
    press(&mut shell, Key::Back).await;
    press(&mut shell, Key::Back).await;
    assert_eq!(shell.views().len(), 1);
    assert_eq!(current_view(&shell), MENU_VIEW_NAME);
}

#[tokio::test]
async fn starting_a_movie_walks_menu_browser_sheet_video() {
    let mut shell = shell_with_media(vec![entry(MediaKind::File, "Alien")]).await;

    press(&mut shell, Key::Enter).await; // open browser
    press(&mut shell, Key::Enter).await; // open movie sheet overlay
    press(&mut shell, Key::Enter).await; // start the movie
    assert_eq!(current_view(&shell), VIDEO_VIEW_NAME);

    // the video view owns transport keys; Stop pops back to the browser
    press(&mut shell, Key::Stop).await;
    assert_eq!(current_view(&shell), VIDEO_BROWSER_VIEW_NAME);
}

#[tokio::test]
async fn sheet_overlay_captures_keys_without_leaving_the_browser() {
    let mut shell = shell_with_media(vec![
        entry(MediaKind::File, "Alien"),
        entry(MediaKind::File, "Brazil"),
    ]).await;

    press(&mut shell, Key::Enter).await; // browser
    press(&mut shell, Key::Enter).await; // overlay for "Alien"
    let handlers_with_overlay = shell.keys().len();

    // Back closes the overlay, not the browser view
    press(&mut shell, Key::Back).await;
    assert_eq!(current_view(&shell), VIDEO_BROWSER_VIEW_NAME);
    assert_eq!(shell.keys().len(), handlers_with_overlay - 1);
}

#[tokio::test]
async fn browser_presents_folders_first_even_from_an_unsorted_provider() {
    let mut shell = shell_with_media(vec![
        entry(MediaKind::File, "B"),
        entry(MediaKind::File, "A"),
        entry(MediaKind::Folder, "Series"),
    ]).await;

    press(&mut shell, Key::Enter).await;

    // first cell is the folder: Enter drills down instead of opening a sheet
    press(&mut shell, Key::Enter).await;
    assert_eq!(shell.views().len(), 3);
    assert_eq!(current_view(&shell), VIDEO_BROWSER_VIEW_NAME);
}

#[tokio::test]
async fn browser_selection_survives_a_round_trip_through_playback() {
    let mut shell = shell_with_media(vec![
        entry(MediaKind::File, "A"),
        entry(MediaKind::File, "B"),
    ]).await;

    press(&mut shell, Key::Enter).await; // browser
    press(&mut shell, Key::Right).await; // select "B"
    press(&mut shell, Key::Enter).await; // sheet
    press(&mut shell, Key::Enter).await; // play
    assert_eq!(current_view(&shell), VIDEO_VIEW_NAME);

    press(&mut shell, Key::Back).await; // back to the browser
    assert_eq!(current_view(&shell), VIDEO_BROWSER_VIEW_NAME);

    // the restored selection still points at "B": playing again starts it
    press(&mut shell, Key::PlayPause).await;
    assert_eq!(current_view(&shell), VIDEO_VIEW_NAME);
}

#[tokio::test]
async fn power_quits_from_anywhere() {
    let mut shell = shell_with_media(vec![entry(MediaKind::File, "Alien")]).await;
    press(&mut shell, Key::Enter).await;
    assert!(!shell.quit_requested());

    press(&mut shell, Key::Power).await;
    assert!(shell.quit_requested());
}

#[tokio::test]
async fn menu_selection_clamps_and_settings_is_inert() {
    let mut shell = shell_with_media(vec![]).await;

    press(&mut shell, Key::Up).await; // clamped at the first entry
    press(&mut shell, Key::Down).await; // "Settings"
    press(&mut shell, Key::Enter).await; // no action, no navigation
    assert_eq!(current_view(&shell), MENU_VIEW_NAME);
    assert_eq!(shell.views().len(), 1);
}

#[tokio::test]
async fn only_the_active_view_holds_a_key_handler() {
    let mut shell = shell_with_media(vec![entry(MediaKind::File, "Alien")]).await;

    // base pass-through + global Back + global Power + the active view
    let with_one_view = shell.keys().len();
    assert_eq!(with_one_view, 4);

    // a suspended view's handler is popped with its end transition, so the
    // count stays constant however deep the view stack grows
    press(&mut shell, Key::Enter).await;
    assert_eq!(shell.views().len(), 2);
    assert_eq!(shell.keys().len(), with_one_view);

    press(&mut shell, Key::Back).await;
    assert_eq!(shell.views().len(), 1);
    assert_eq!(shell.keys().len(), with_one_view);
}

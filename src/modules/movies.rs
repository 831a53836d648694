//! The movies module: file browsing and playback.
//!
//! Contributes the `Movies.VideoBrowser` view, a main-menu entry opening the
//! browser at the configured media path, and listeners for the browse and
//! start-video commands so any part of the application can trigger playback
//! without holding platform handles itself.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use super::{Module, ModuleContext};
use crate::nav::command::Command;
use crate::nav::event::commands;
use crate::nav::menu::{ActionResult, MenuEntry};
use crate::views::video_browser::{
    BrowserViewState, VIDEO_BROWSER_VIEW_NAME, VideoBrowserController,
};
use crate::views::video_view::VIDEO_VIEW_NAME;

pub struct MoviesModule;

impl Module for MoviesModule {
    fn name(&self) -> &str {
        "Movies"
    }

    fn set_up(&self, ctx: &mut ModuleContext<'_>) -> Result<()> {
        // module-wide translations; view dictionaries load lazily on push
        ctx.i18n
            .borrow_mut()
            .load_dictionary(&ctx.module_dir(self.name()).join("locale"));

        let media = ctx.platform.media.clone();
        ctx.registry.register(VIDEO_BROWSER_VIEW_NAME, move || {
            Rc::new(RefCell::new(VideoBrowserController::new(media.clone())))
        })?;

        self.install_menus(ctx);
        self.subscribe_commands(ctx);
        Ok(())
    }
}

impl MoviesModule {
    fn install_menus(&self, ctx: &mut ModuleContext<'_>) {
        let title = ctx.i18n.borrow().translate("Movies");
        let search_path = ctx.config.media_search_path.clone();
        let main = ctx.menus.main_menu();
        ctx.menus.append_entry(
            main,
            MenuEntry::new(title).action(move |sink| {
                sink.queue(Command::post(commands::browse_videos_at_file_url(
                    &search_path,
                )));
                ActionResult::Proceed
            }),
        );
    }

    fn subscribe_commands(&self, ctx: &mut ModuleContext<'_>) {
        ctx.bus.subscribe_to(
            commands::BROWSE_VIDEOS_AT_FILE_URL,
            Box::new(|event, sink| {
                let Some(url) = event.param("url").and_then(|v| v.as_str()) else {
                    log::error!("browse command without a url parameter");
                    return true;
                };
                sink.queue(Command::push_view_with(
                    VIDEO_BROWSER_VIEW_NAME,
                    BrowserViewState::new(url),
                ));
                true
            }),
        );

        let video = ctx.platform.video.clone();
        ctx.bus.subscribe_to(
            commands::START_VIDEO,
            Box::new(move |event, sink| {
                let Some(url) = event.param("url").and_then(|v| v.as_str()) else {
                    log::error!("start command without a url parameter");
                    return true;
                };
                if video.select(url) && video.play() {
                    sink.queue(Command::push_view(VIDEO_VIEW_NAME));
                } else {
                    log::error!("player refused to start {url}");
                }
                true
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::locale::Localization;
    use crate::nav::command::CommandSink;
    use crate::nav::event::EventBus;
    use crate::nav::menu::MenuModel;
    use crate::nav::stack::ViewRegistry;
    use crate::platform::{PlayMode, Platform};

    struct Fixture {
        menus: MenuModel,
        bus: EventBus,
        platform: Platform,
    }

    fn set_up_movies() -> Fixture {
        let config = Config::default();
        let platform = Platform::from_config(&config).unwrap();
        let i18n = Rc::new(RefCell::new(Localization::new("en")));
        let mut menus = MenuModel::new("Main");
        let mut registry = ViewRegistry::new();
        let mut bus = EventBus::new();

        {
            let mut ctx = ModuleContext {
                config: &config,
                platform: &platform,
                i18n,
                menus: &mut menus,
                registry: &mut registry,
                bus: &mut bus,
            };
            MoviesModule.set_up(&mut ctx).unwrap();
        }

        Fixture {
            menus,
            bus,
            platform,
        }
    }

    #[test]
    fn menu_entry_posts_the_browse_command() {
        let fixture = set_up_movies();
        let main = fixture.menus.main_menu();
        let entry = fixture.menus.items(main)[0];
        assert_eq!(fixture.menus.entry_title(entry), "Movies");

        let mut sink = CommandSink::new();
        fixture.menus.activate_entry(entry, &mut sink);
        match sink.take_next() {
            Some(Command::Post(event)) => {
                assert_eq!(event.event_type(), commands::BROWSE_VIDEOS_AT_FILE_URL);
            }
            _ => panic!("expected a posted command"),
        }
    }

    #[test]
    fn browse_command_pushes_the_browser_at_the_url() {
        let mut fixture = set_up_movies();
        let mut sink = CommandSink::new();

        let handled = fixture.bus.publish(
            &commands::browse_videos_at_file_url("/srv/media"),
            &mut sink,
        );
        assert!(handled);
        match sink.take_next() {
            Some(Command::PushView { name, data }) => {
                assert_eq!(name, VIDEO_BROWSER_VIEW_NAME);
                let state = data.unwrap().downcast::<BrowserViewState>().unwrap();
                assert_eq!(state.path, "/srv/media");
            }
            _ => panic!("expected a push of the browser"),
        }
    }

    #[test]
    fn start_command_starts_playback_and_pushes_the_video_view() {
        let mut fixture = set_up_movies();
        let mut sink = CommandSink::new();

        fixture
            .bus
            .publish(&commands::start_video("/m/Alien.mkv"), &mut sink);

        assert_eq!(fixture.platform.video.play_mode().0, PlayMode::Playing);
        match sink.take_next() {
            Some(Command::PushView { name, .. }) => assert_eq!(name, VIDEO_VIEW_NAME),
            _ => panic!("expected a push of the video view"),
        }
    }

    #[test]
    fn start_command_without_url_is_swallowed() {
        let mut fixture = set_up_movies();
        let mut sink = CommandSink::new();

        let event = crate::nav::event::Event::command("StartVideo", serde_json::json!({}));
        assert!(fixture.bus.publish(&event, &mut sink));
        assert!(sink.is_empty());
    }
}

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;

use telecine::config::Config;
use telecine::locale::{DictionaryResources, Localization};
use telecine::modules::{ModuleContext, ModuleManager, MoviesModule};
use telecine::nav::{
    EventBus, MENU_VIEW_NAME, MenuEntry, MenuModel, Shell, ViewRegistry, ViewStack,
};
use telecine::platform::Platform;
use telecine::views::{MenuViewController, VIDEO_VIEW_NAME, VideoViewController};

#[derive(Parser)]
#[command(name = "telecine", version, about = "Remote-control media browser")]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured media search path
    #[arg(long, value_name = "DIR")]
    media_dir: Option<String>,

    /// Override the configured locale
    #[arg(long, value_name = "LOCALE")]
    locale: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.media_dir {
        config.media_search_path = dir;
    }
    if let Some(locale) = args.locale {
        config.locale = locale;
    }

    let platform = Platform::from_config(&config)?;
    let i18n = Rc::new(RefCell::new(Localization::new(config.locale.as_str())));
    i18n.borrow_mut()
        .load_dictionary(&config.assets_root.join("locale"));

    let mut menus = MenuModel::new(i18n.borrow().translate("Main Menu"));
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
        manager.set_up_all(&mut ctx)?;
    }

    // placeholder until a settings module exists; activating it is a no-op
    let settings_title = i18n.borrow().translate("Settings");
    menus.append_entry(menus.main_menu(), MenuEntry::new(settings_title));

    let menus = Rc::new(menus);
    let main_menu = menus.main_menu();

    {
        let menus = menus.clone();
        let i18n = i18n.clone();
        registry.register(MENU_VIEW_NAME, move || {
            Rc::new(RefCell::new(MenuViewController::new(
                menus.clone(),
                i18n.clone(),
            )))
        })?;
    }
    {
        let video = platform.video.clone();
        registry.register(VIDEO_VIEW_NAME, move || {
            Rc::new(RefCell::new(VideoViewController::new(video.clone())))
        })?;
    }

    let resources = DictionaryResources::new(config.assets_root.clone(), i18n.clone());
    let views = ViewStack::new(registry, Box::new(resources));

    let mut shell = Shell::new(views, bus, platform, i18n);
    shell.show_menu(main_menu);
    shell.run().await
}

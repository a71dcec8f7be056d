use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};

use services::QuizService;
use ui::{App, UiApp, build_app_context};

struct DesktopApp {
    quiz_service: Arc<QuizService>,
}

impl UiApp for DesktopApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }
}

/// Open the quiz window. Blocks until it is closed.
pub fn launch(service: QuizService) {
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        quiz_service: Arc::new(service),
    });
    let context = build_app_context(&app);

    // Some window managers default to always-on-top for dev builds.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Civics Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

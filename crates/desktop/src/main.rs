mod app;
mod settings;
mod workers;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .title("FaceWatch")
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(760.0, 660.0),
            ..Default::default()
        })
        .run()
}

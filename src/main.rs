mod app;
mod gestures;
mod viewer;

fn main() -> iced::Result {
    env_logger::init();
    app::run()
}

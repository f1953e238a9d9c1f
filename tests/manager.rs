use epd_waveshare_protocol::command::render;
use epd_waveshare_protocol::epd2in7_v2;
use epd_waveshare_protocol::prelude::*;

#[derive(Default)]
struct Recorder {
    busy_level: bool,
    flushes: Vec<Vec<Command>>,
}

impl CommandExecutor for Recorder {
    type Error = core::convert::Infallible;

    fn busy_asserted_level(&self) -> bool {
        self.busy_level
    }

    fn set_busy_asserted_level(&mut self, level: bool) {
        self.busy_level = level;
    }

    fn execute(&mut self, commands: &mut [Command]) -> Result<(), Self::Error> {
        for command in commands.iter_mut() {
            if let Command::ReadData { value, .. } = command {
                *value = Some(0x19);
            }
        }
        self.flushes.push(commands.to_vec());
        Ok(())
    }
}

fn initializations(commands: &[Command]) -> usize {
    render(commands)
        .iter()
        .filter(|line| line.starts_with("DebugMessage Initializing device"))
        .count()
}

#[test]
fn initialize_only_when_style_changes() {
    let mut manager = DisplayManager::new(DisplayKind::Epd2in7V2, Recorder::default());
    let white = Image::filled(manager.width(), manager.height(), PixelColor::White);
    let gray = Image::filled(manager.width(), manager.height(), PixelColor::LightGray);

    manager.begin_batch();
    manager
        .draw(&white, DisplayColorStyle::BlackAndWhite, RefreshMode::Full)
        .unwrap();
    manager
        .draw(&white, DisplayColorStyle::BlackAndWhite, RefreshMode::Full)
        .unwrap();
    assert_eq!(initializations(manager.pending()), 1);

    manager
        .draw(&gray, DisplayColorStyle::FourGray, RefreshMode::Full)
        .unwrap();
    assert_eq!(initializations(manager.pending()), 2);
    manager.end_batch().unwrap();

    let flushes = &manager.executor().flushes;
    assert_eq!(flushes.len(), 1);
    assert_eq!(initializations(&flushes[0]), 2);
    let turn_off = epd2in7_v2::Epd2in7.turn_off();
    assert!(flushes[0].ends_with(&turn_off));
}

#[test]
fn new_batch_initializes_again() {
    let mut manager = DisplayManager::new(DisplayKind::Epd2in7V2, Recorder::default());
    assert!(manager.executor().busy_asserted_level());

    manager.clear_screen(PixelColor::Black).unwrap();
    manager.clear_screen(PixelColor::Black).unwrap();

    let flushes = &manager.executor().flushes;
    assert_eq!(flushes.len(), 2);
    assert_eq!(render(&flushes[0]), render(&flushes[1]));
}

#[test]
fn nested_batches_flush_once() {
    let mut manager = DisplayManager::new(DisplayKind::Epd2in13bc, Recorder::default());
    let mut image = Image::filled(manager.width(), manager.height(), PixelColor::White);
    image.set(3, 3, PixelColor::Red);

    manager.begin_batch();
    manager.clear_screen(PixelColor::White).unwrap();
    manager.begin_batch();
    manager
        .draw_full_screen(&image, image.detect_minimum_style().unwrap())
        .unwrap();
    manager.end_batch().unwrap();
    assert!(manager.executor().flushes.is_empty());
    manager.end_batch().unwrap();

    assert_eq!(manager.executor().flushes.len(), 1);
    assert_eq!(manager.applied(), None);
}

#[test]
fn capabilities() {
    let manager = DisplayManager::new(DisplayKind::Epd2in13bc, Recorder::default());
    assert!(manager.can_display_color(PixelColor::Red));
    assert!(!manager.can_display_color(PixelColor::LightGray));
    assert_eq!(
        manager.maximum_style(),
        Some(DisplayColorStyle::BlackAndWhiteAndRed)
    );
    assert_eq!(manager.kind(), DisplayKind::Epd2in13bc);
}

#[test]
fn read_data_is_filled_in() {
    let mut recorder = Recorder::default();
    let mut commands = epd2in7_v2::Epd2in7.read_temperature(7);
    recorder.execute(&mut commands).unwrap();
    assert!(commands.iter().any(|command| matches!(
        command,
        Command::ReadData {
            command: 0x1B,
            correlation_id: 7,
            value: Some(0x19)
        }
    )));
}

use OdeTopo::Utils::logging::init_logging;
use OdeTopo::cli::cli_main::run_interactive_menu;
use OdeTopo::settings::ConverterSettings;

pub fn main() {
    let settings = ConverterSettings::load_default();
    if let Err(e) = init_logging(settings.level_filter(), settings.log_file.as_deref()) {
        eprintln!("logging is not available: {}", e);
    }
    run_interactive_menu(&settings);
}

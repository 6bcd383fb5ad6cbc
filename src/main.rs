//! Split a font into size-bounded chunks with a unicode-range stylesheet.

use fontsplit::core;

fn main() {
    let cli_args = core::platform::get_cli_args();
    if let Err(error) = core::run_app(cli_args) {
        core::platform::handle_error(error);
    }
}

mod cli_impl;

fn main() {
    std::process::exit(cli_impl::run());
}

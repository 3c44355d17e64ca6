fn main() {
    ttt_cli::cli::run();
}

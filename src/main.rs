fn main() -> std::process::ExitCode {
    lexreview_lib::run()
}

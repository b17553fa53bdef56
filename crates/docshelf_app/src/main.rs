mod shell;

fn main() {
    shell::run_app()
}

fn main() {
    sprout::start_cli();
}

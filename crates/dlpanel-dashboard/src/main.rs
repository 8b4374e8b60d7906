fn main() {
    dlpanel_dashboard::main();
}

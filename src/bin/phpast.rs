fn main() {
    php_ast::cli::run();
}

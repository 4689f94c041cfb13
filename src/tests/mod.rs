#[cfg(test)]
mod catalog_tests;
#[cfg(test)]
mod gpio_tests;

mod test_support;

mod evaluation_order_tests;

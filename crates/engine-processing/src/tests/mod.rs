mod row_driver;

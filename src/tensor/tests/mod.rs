mod axis_tests;

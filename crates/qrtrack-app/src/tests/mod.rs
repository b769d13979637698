mod surface_tests;

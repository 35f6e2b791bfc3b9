mod extraction_outcome_test;

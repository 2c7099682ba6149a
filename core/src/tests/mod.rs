mod term_set;
